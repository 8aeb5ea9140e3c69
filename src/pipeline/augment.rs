//! Randomized augmentation decisions.
//!
//! All randomness for one training example is drawn up front into an
//! `AugmentDecisions`, then applied to the frame stack, the mask stack and
//! the intrinsics. That keeps the three tensors paired: the same flip and
//! the same crop window land on each of them.

use anyhow::Result;
use ndarray::Array3;
use rand::Rng;

use crate::data::{FlipMode, Intrinsics, LoaderConfig};
use crate::pipeline::image_ops;

/// Independent coin-flips gating each colorspace adjustment.
#[derive(Debug, Clone, Default)]
pub struct ColorJitter {
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
    pub hue: Option<f32>,
}

/// Upscale factors plus the crop window that brings the image back to its
/// original dimensions.
#[derive(Debug, Clone, Copy)]
pub struct ScaleCrop {
    pub x_scaling: f32,
    pub y_scaling: f32,
    pub scaled_w: usize,
    pub scaled_h: usize,
    pub offset_x: usize,
    pub offset_y: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AugmentDecisions {
    pub color: ColorJitter,
    pub flip: bool,
    pub scale_crop: Option<ScaleCrop>,
}

impl AugmentDecisions {
    pub fn draw<R: Rng>(rng: &mut R, config: &LoaderConfig) -> Self {
        let color = if config.random_color {
            ColorJitter {
                brightness: coin(rng).then(|| rng.gen_range(-0.1..0.1f32)),
                contrast: coin(rng).then(|| rng.gen_range(0.85..1.15f32)),
                saturation: coin(rng).then(|| rng.gen_range(0.85..1.15f32)),
                hue: coin(rng).then(|| rng.gen_range(-0.1..0.1f32)),
            }
        } else {
            ColorJitter::default()
        };

        let flip = match config.flip_mode {
            FlipMode::Random => coin(rng),
            FlipMode::Always => true,
            FlipMode::None => false,
        };

        let scale_crop = if config.random_scale_crop {
            let x_scaling = rng.gen_range(1.0..1.15f32);
            let y_scaling = rng.gen_range(1.0..1.15f32);
            let scaled_w = (config.img_width as f32 * x_scaling) as usize;
            let scaled_h = (config.img_height as f32 * y_scaling) as usize;
            Some(ScaleCrop {
                x_scaling,
                y_scaling,
                scaled_w,
                scaled_h,
                offset_x: rng.gen_range(0..=scaled_w - config.img_width),
                offset_y: rng.gen_range(0..=scaled_h - config.img_height),
            })
        } else {
            None
        };

        Self {
            color,
            flip,
            scale_crop,
        }
    }

    /// Colorspace jitter, applied to the wide sequence image before unpacking.
    pub fn apply_color(&self, image: &mut Array3<f32>) -> Result<()> {
        if let Some(delta) = self.color.brightness {
            image_ops::adjust_brightness(image, delta);
        }
        if let Some(factor) = self.color.contrast {
            image_ops::adjust_contrast(image, factor);
        }
        if let Some(factor) = self.color.saturation {
            image_ops::adjust_saturation(image, factor)?;
        }
        if let Some(delta) = self.color.hue {
            image_ops::adjust_hue(image, delta)?;
        }
        image_ops::clip_unit(image);
        Ok(())
    }

    /// Flip and scale+crop for the frame stack. Output keeps `[h, w]`.
    pub fn apply_to_frames(&self, stack: &Array3<f32>, h: usize, w: usize) -> Result<Array3<f32>> {
        let mut out = if self.flip {
            image_ops::flip_stack(stack)
        } else {
            stack.clone()
        };
        if let Some(sc) = self.scale_crop {
            out = image_ops::resize_bilinear(&out, sc.scaled_h, sc.scaled_w);
            out = image_ops::crop_stack(&out, sc.offset_y, sc.offset_x, h, w)?;
        }
        Ok(out)
    }

    /// Same geometry as `apply_to_frames`, but nearest-neighbour so mask
    /// labels survive untouched.
    pub fn apply_to_mask(&self, stack: &Array3<u8>, h: usize, w: usize) -> Result<Array3<u8>> {
        let mut out = if self.flip {
            image_ops::flip_stack(stack)
        } else {
            stack.clone()
        };
        if let Some(sc) = self.scale_crop {
            out = image_ops::resize_nearest(&out, sc.scaled_h, sc.scaled_w);
            out = image_ops::crop_stack(&out, sc.offset_y, sc.offset_x, h, w)?;
        }
        Ok(out)
    }

    /// Keeps the calibration matrix matched with the transformed images.
    pub fn apply_to_intrinsics(&self, intrinsics: &Intrinsics, img_width: f32) -> Intrinsics {
        let mut k = *intrinsics;
        if self.flip {
            k = k.flipped(img_width);
        }
        if let Some(sc) = self.scale_crop {
            k = k
                .scaled(sc.x_scaling, sc.y_scaling)
                .cropped(sc.offset_x as f32, sc.offset_y as f32);
        }
        k
    }
}

fn coin<R: Rng>(rng: &mut R) -> bool {
    rng.gen_range(0.0..1.0f32) < 0.5
}
