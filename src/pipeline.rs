pub mod augment;
pub mod image_ops;
pub mod paths;
pub mod reader;

pub use paths::SequencePaths;
pub use reader::{BatchIterator, DataReader};
