mod utils;
pub mod data;
pub mod pipeline;

use crate::data::LoaderConfig;
use crate::pipeline::{BatchIterator, DataReader};

pub use crate::data::{Batch, FlipMode, Intrinsics, ReaderStats, SampleSet};

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Builds a reader over the given data directory.
pub fn init_reader(config: LoaderConfig) -> anyhow::Result<DataReader> {
    log::info!(
        "Initializing sequence reader over {} ({}x{}, seq_length={}, batch={})",
        config.data_dir,
        config.img_width,
        config.img_height,
        config.seq_length,
        config.batch_size
    );
    DataReader::new(config)
}

/// Starts the feed worker and returns the batch stream for the training loop.
pub fn run_pipeline(reader: &mut DataReader) -> anyhow::Result<BatchIterator> {
    let batches = reader.read_data()?;
    log::info!("Dataset successfully processed, {} steps per epoch", reader.steps_per_epoch());
    Ok(batches)
}
