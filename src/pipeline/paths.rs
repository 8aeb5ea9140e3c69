//! Discovery and ordering of the on-disk training records.
//!
//! A data directory holds `<step>.png` frame triplets, `<step>-fseg.png`
//! segmentation masks and `<step>_cam.csv` intrinsics rows. Files are
//! ordered by the numeric step token in the stem, not lexicographically.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use regex::Regex;

#[derive(Debug, Clone, Default)]
pub struct SequencePaths {
    pub frames: Vec<PathBuf>,
    pub masks: Vec<PathBuf>,
    pub intrinsics: Vec<PathBuf>,
}

impl SequencePaths {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Collects and orders the frame/mask/intrinsics files under `data_dir`.
    ///
    /// `repetitions > 0` repeats every record that many times in place,
    /// used when refining online against the same sample.
    pub fn collect(data_dir: &str, extension: &str, repetitions: usize) -> Result<Self> {
        let dir = Path::new(data_dir);
        let mask_suffix = format!("-fseg.{}", extension);
        let frame_suffix = format!(".{}", extension);

        let mut frames: Vec<PathBuf> = Vec::new();
        let mut masks: Vec<PathBuf> = Vec::new();
        let mut intrinsics: Vec<PathBuf> = Vec::new();

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read data directory {}", data_dir))?;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };

            if name.ends_with("_cam.csv") {
                intrinsics.push(path);
            } else if name.ends_with(&mask_suffix) {
                masks.push(path);
            } else if name.ends_with(&frame_suffix) && !name.contains("fseg") {
                frames.push(path);
            }
        }

        sort_by_step(&mut frames)?;
        sort_by_step(&mut masks)?;
        sort_by_step(&mut intrinsics)?;

        if frames.is_empty() {
            bail!("No *.{} frame sequences found in {}", extension, data_dir);
        }
        if frames.len() != masks.len() || frames.len() != intrinsics.len() {
            bail!(
                "Mismatched record counts in {}: {} frames, {} masks, {} intrinsics",
                data_dir,
                frames.len(),
                masks.len(),
                intrinsics.len()
            );
        }

        let mut collected = Self {
            frames,
            masks,
            intrinsics,
        };
        if repetitions > 0 {
            collected = collected.repeated(repetitions);
        }

        log::info!(
            "Collected {} records from {} ({} after repetitions)",
            collected.len() / repetitions.max(1),
            data_dir,
            collected.len()
        );
        Ok(collected)
    }

    fn repeated(&self, repetitions: usize) -> Self {
        let repeat = |paths: &[PathBuf]| -> Vec<PathBuf> {
            paths
                .iter()
                .flat_map(|p| std::iter::repeat(p.clone()).take(repetitions))
                .collect()
        };
        Self {
            frames: repeat(&self.frames),
            masks: repeat(&self.masks),
            intrinsics: repeat(&self.intrinsics),
        }
    }
}

/// Orders paths by the leading numeric token of the file stem, so that
/// `10.png` sorts after `9.png`.
fn sort_by_step(paths: &mut [PathBuf]) -> Result<()> {
    let step_re = Regex::new(r"^(\d+)").expect("static regex");

    let mut keyed: Vec<(u64, PathBuf)> = Vec::with_capacity(paths.len());
    for path in paths.iter() {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Non-UTF8 file name: {}", path.display()))?;
        let step = step_re
            .captures(stem)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .with_context(|| format!("No numeric step token in file name: {}", path.display()))?;
        keyed.push((step, path.clone()));
    }

    keyed.sort_by_key(|(step, _)| *step);
    for (slot, (_, path)) in paths.iter_mut().zip(keyed) {
        *slot = path;
    }
    Ok(())
}
