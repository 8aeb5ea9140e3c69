//! Options for building the sequence reader.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::FlipMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub data_dir: String,
    pub file_extension: String,
    pub batch_size: usize,
    pub img_height: usize,
    pub img_width: usize,
    pub seq_length: usize,
    pub num_scales: usize,

    // augmentation
    pub flip_mode: FlipMode,
    pub random_scale_crop: bool,
    pub random_color: bool,
    pub imagenet_norm: bool,

    // shuffling / batching
    pub shuffle: bool,
    pub shuffle_buffer: usize,
    pub seed: u64,
    pub prefetch: usize,

    // online refinement: feed every sample `repetitions` times in a row
    pub repetitions: usize,
    pub profile: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            file_extension: "png".to_string(),
            batch_size: 4,
            img_height: 128,
            img_width: 416,
            seq_length: 3,
            num_scales: 4,

            flip_mode: FlipMode::Random,
            random_scale_crop: false,
            random_color: true,
            imagenet_norm: true,

            shuffle: true,
            shuffle_buffer: 1500,
            seed: 2,
            prefetch: 2,

            repetitions: 0,
            profile: false,
        }
    }
}

#[allow(dead_code)]
impl LoaderConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_data_dir(mut self, data_dir: &str) -> Result<Self> {
        // A trailing separator would break the numeric stem parsing later on
        self.data_dir = data_dir.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_file_extension(mut self, ext: &str) -> Self {
        self.file_extension = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn with_img_height(mut self, n: usize) -> Self {
        self.img_height = n;
        self
    }

    pub fn with_img_width(mut self, n: usize) -> Self {
        self.img_width = n;
        self
    }

    pub fn with_seq_length(mut self, n: usize) -> Self {
        self.seq_length = n;
        self
    }

    pub fn with_num_scales(mut self, n: usize) -> Self {
        self.num_scales = n;
        self
    }

    pub fn with_flip_mode(mut self, mode: FlipMode) -> Self {
        self.flip_mode = mode;
        self
    }

    pub fn with_random_scale_crop(mut self, x: bool) -> Self {
        self.random_scale_crop = x;
        self
    }

    pub fn with_random_color(mut self, x: bool) -> Self {
        self.random_color = x;
        self
    }

    pub fn with_imagenet_norm(mut self, x: bool) -> Self {
        self.imagenet_norm = x;
        self
    }

    pub fn with_shuffle(mut self, x: bool) -> Self {
        self.shuffle = x;
        self
    }

    pub fn with_shuffle_buffer(mut self, n: usize) -> Self {
        self.shuffle_buffer = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_prefetch(mut self, n: usize) -> Self {
        self.prefetch = n;
        self
    }

    pub fn with_repetitions(mut self, n: usize) -> Self {
        self.repetitions = n;
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    /// Validates dimension/batch fields before the reader starts.
    pub fn check(&self) -> Result<()> {
        if self.data_dir.is_empty() {
            anyhow::bail!("No data directory specified. Use `config.with_data_dir(path)`.");
        }
        if self.batch_size == 0 {
            anyhow::bail!("Batch size must be at least 1.");
        }
        if self.seq_length == 0 {
            anyhow::bail!("Sequence length must be at least 1.");
        }
        if self.num_scales == 0 {
            anyhow::bail!("Number of scales must be at least 1.");
        }
        if self.img_height == 0 || self.img_width == 0 {
            anyhow::bail!("Image dimensions must be non-zero, got {}x{}.", self.img_width, self.img_height);
        }
        Ok(())
    }
}
