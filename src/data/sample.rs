//! Per-sample and per-batch tensor bundles produced by the pipeline.

use anyhow::Result;
use ndarray::{Array3, Array4, Axis};

/// One fully transformed training example.
///
/// Image tensors are `[H, W, 3 * seq_length]` channel stacks in `[0, 1]`,
/// the mask stack keeps its raw `u8` labels, intrinsics stacks are
/// `[num_scales, 3, 3]`.
#[derive(Debug, Clone)]
pub struct SampleSet {
    pub image: Array3<f32>,
    pub image_norm: Array3<f32>,
    pub mask: Array3<u8>,
    pub intrinsics: Array3<f32>,
    pub intrinsics_inv: Array3<f32>,
}

/// A batch of samples stacked along a leading batch axis.
#[derive(Debug, Clone)]
pub struct Batch {
    pub image: Array4<f32>,
    pub image_norm: Array4<f32>,
    pub mask: Array4<u8>,
    pub intrinsics: Array4<f32>,
    pub intrinsics_inv: Array4<f32>,
}

impl Batch {
    /// Stacks the per-sample tensors into batched tensors.
    pub fn from_samples(samples: &[SampleSet]) -> Result<Self> {
        if samples.is_empty() {
            anyhow::bail!("Cannot build a batch from zero samples.");
        }

        let image = ndarray::stack(
            Axis(0),
            &samples.iter().map(|s| s.image.view()).collect::<Vec<_>>(),
        )?;
        let image_norm = ndarray::stack(
            Axis(0),
            &samples.iter().map(|s| s.image_norm.view()).collect::<Vec<_>>(),
        )?;
        let mask = ndarray::stack(
            Axis(0),
            &samples.iter().map(|s| s.mask.view()).collect::<Vec<_>>(),
        )?;
        let intrinsics = ndarray::stack(
            Axis(0),
            &samples.iter().map(|s| s.intrinsics.view()).collect::<Vec<_>>(),
        )?;
        let intrinsics_inv = ndarray::stack(
            Axis(0),
            &samples.iter().map(|s| s.intrinsics_inv.view()).collect::<Vec<_>>(),
        )?;

        Ok(Self {
            image,
            image_norm,
            mask,
            intrinsics,
            intrinsics_inv,
        })
    }

    pub fn len(&self) -> usize {
        self.image.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
