mod flip_mode;
mod intrinsics;
mod loader_config;
mod sample;
pub mod send_channels;
mod reader_stats;

pub use flip_mode::FlipMode;
pub use intrinsics::Intrinsics;
pub use loader_config::LoaderConfig;
pub use reader_stats::ReaderStats;
pub use sample::{Batch, SampleSet};
