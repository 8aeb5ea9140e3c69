//! Reads stored sequences which are produced by the dataset generator.
//!
//! One record on disk is a side-by-side frame triplet, its segmentation
//! mask and a 9-value intrinsics row. `DataReader` decodes and augments
//! records in parallel with rayon, shuffles and batches them, and feeds
//! batches through a bounded channel so the training loop can consume a
//! prefetched `BatchIterator`.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::data::send_channels::{BatchState, FeedState};
use crate::data::{Batch, Intrinsics, LoaderConfig, ReaderStats, SampleSet};
use crate::pipeline::augment::AugmentDecisions;
use crate::pipeline::image_ops::{self, ResizeMode};
use crate::pipeline::paths::SequencePaths;
use crate::utils;

pub struct DataReader {
    config: LoaderConfig,
    stats: ReaderStats,
    steps_per_epoch: usize,
}

impl DataReader {
    pub fn new(config: LoaderConfig) -> Result<Self> {
        config.check()?;
        Ok(Self {
            config,
            stats: ReaderStats::new(),
            steps_per_epoch: 0,
        })
    }

    /// Batches emitted per pass over the data. Valid after `read_data`.
    pub fn steps_per_epoch(&self) -> usize {
        self.steps_per_epoch
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats.clone()
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Provides batched images, masks and camera intrinsics.
    ///
    /// Spawns the feed worker and returns the consuming iterator. With
    /// shuffling enabled the stream repeats endlessly and trailing partial
    /// batches are dropped; without it the stream is a single ordered pass.
    pub fn read_data(&mut self) -> Result<BatchIterator> {
        let paths = SequencePaths::collect(
            &self.config.data_dir,
            &self.config.file_extension,
            self.config.repetitions,
        )?;
        self.steps_per_epoch = paths.len() / self.config.batch_size;

        log::info!(
            "Datasets loaded: {} records, {} steps per epoch",
            paths.len(),
            self.steps_per_epoch
        );

        let (batch_tx, batch_rx) = crossbeam_channel::bounded(self.config.prefetch.max(1));
        let feed = FeedState { batch_tx };
        let state = BatchState { batch_rx };

        let config = self.config.clone();
        let stats = self.stats.clone();
        std::thread::spawn(move || feed_loop(paths, config, feed, stats));

        Ok(BatchIterator { state })
    }
}

/// Iterator over prefetched batches. Ends when the feed worker finishes a
/// non-shuffled pass or hits an error.
pub struct BatchIterator {
    state: BatchState,
}

impl Iterator for BatchIterator {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        self.state.batch_rx.recv().ok().map(|b| *b)
    }
}

fn feed_loop(paths: SequencePaths, config: LoaderConfig, feed: FeedState, stats: ReaderStats) {
    let n = paths.len();
    let mut order_rng = StdRng::seed_from_u64(config.seed);
    let mut epoch: u64 = 0;

    loop {
        let order = epoch_order(n, &config, &mut order_rng);

        for chunk in order.chunks(config.batch_size) {
            // drop_remainder semantics while shuffling
            if config.shuffle && chunk.len() < config.batch_size {
                continue;
            }

            let batch_time = Instant::now();
            let samples: Result<Vec<SampleSet>> = chunk
                .par_iter()
                .map(|&i| {
                    let sample_seed = config
                        .seed
                        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
                        .wrapping_add(epoch.wrapping_mul(n as u64).wrapping_add(i as u64));
                    load_sample(&paths, i, &config, sample_seed)
                })
                .collect();

            let samples = match samples {
                Ok(samples) => samples,
                Err(err) => {
                    log::error!("seq_loader: failed to load sample: {:#}", err);
                    return;
                }
            };
            let batch = match Batch::from_samples(&samples) {
                Ok(batch) => batch,
                Err(err) => {
                    log::error!("seq_loader: failed to assemble batch: {:#}", err);
                    return;
                }
            };

            if config.profile {
                utils::trace(false, "TIME", "Batch assembled", batch_time, Duration::ZERO);
            }

            if feed.batch_tx.send(Box::new(batch)).is_err() {
                log::trace!("Batch receiver dropped, stopping feed worker");
                return;
            }
            stats.add_batch();
        }

        stats.add_epoch();
        epoch += 1;

        if !config.shuffle {
            break;
        }
    }
}

/// Index order for one epoch. Shuffling happens within windows of
/// `shuffle_buffer` records, mirroring a bounded shuffle buffer.
fn epoch_order(n: usize, config: &LoaderConfig, rng: &mut StdRng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    if config.shuffle {
        let window = config.shuffle_buffer.max(1);
        for chunk in order.chunks_mut(window) {
            chunk.shuffle(rng);
        }
    }
    order
}

/// Decodes and fully transforms one record into a `SampleSet`.
pub fn load_sample(
    paths: &SequencePaths,
    index: usize,
    config: &LoaderConfig,
    sample_seed: u64,
) -> Result<SampleSet> {
    let (h, w, seq) = (config.img_height, config.img_width, config.seq_length);

    let mut rng = StdRng::seed_from_u64(sample_seed);
    let decisions = AugmentDecisions::draw(&mut rng, config);

    // Raw image triplet, resized to the working resolution and scaled to 0-1
    let wide = image_ops::load_image_seq(&paths.frames[index], h, w * seq, ResizeMode::Bilinear)?;
    let mut wide = image_ops::to_unit_f32(&wide);
    decisions.apply_color(&mut wide)?;
    let image = image_ops::unpack_image_seq(&wide, w, seq)?;
    let image = decisions.apply_to_frames(&image, h, w)?;

    // Seg mask, nearest-neighbour so the labels stay intact
    let mask_wide =
        image_ops::load_image_seq(&paths.masks[index], h, w * seq, ResizeMode::Nearest)?;
    let mask = image_ops::unpack_image_seq(&mask_wide, w, seq)?;
    let mask = decisions.apply_to_mask(&mask, h, w)?;

    // Camera intrinsics
    let rows = utils::file_to_vec(paths.intrinsics[index].display().to_string())?;
    let row = rows
        .first()
        .with_context(|| format!("Empty intrinsics file {}", paths.intrinsics[index].display()))?;
    let intrinsics = Intrinsics::from_csv_row(row)?;
    let intrinsics = decisions.apply_to_intrinsics(&intrinsics, w as f32);

    let image_norm = if config.imagenet_norm {
        image_ops::normalize_imagenet(&image, seq)?
    } else {
        image.clone()
    };

    Ok(SampleSet {
        image,
        image_norm,
        mask,
        intrinsics: intrinsics.multi_scale(config.num_scales),
        intrinsics_inv: intrinsics.multi_scale_inverse(config.num_scales),
    })
}
