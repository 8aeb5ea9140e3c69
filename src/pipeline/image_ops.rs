//! Functions to decode and transform image sequences.
//!
//! Frame triplets are stored side-by-side in one file: `[H, W * seq, 3]`.
//! After unpacking they travel through the pipeline as channel stacks
//! `[H, W, 3 * seq]`, matching the layout the depth network consumes.

use std::path::Path;

use anyhow::{bail, Context, Result};
use fast_image_resize::{
    images::Image as FirImage, pixels::PixelType, FilterType, ResizeAlg, ResizeOptions, Resizer,
};
use image::RgbImage;
use ndarray::{s, Array3, Axis};

// See the ResNet encoder for these input-normalizing constants.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_SD: [f32; 3] = [0.229, 0.224, 0.225];

/// Resize mode enum.
#[derive(Debug, Copy, Clone)]
pub enum ResizeMode {
    /// For frame data.
    Bilinear,
    /// For label data (segmentation masks must not be interpolated).
    Nearest,
}

/// Decodes a stored sequence and resizes it to `[target_h, target_w_total, 3]`.
pub fn load_image_seq(
    path: &Path,
    target_h: usize,
    target_w_total: usize,
    mode: ResizeMode,
) -> Result<Array3<u8>> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgb8();
    let src = to_fir_image(image);

    let alg = match mode {
        ResizeMode::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        ResizeMode::Nearest => ResizeAlg::Nearest,
    };
    let options = ResizeOptions::new().resize_alg(alg);
    let mut resizer = Resizer::new();
    let mut dst = FirImage::new(target_w_total as u32, target_h as u32, PixelType::U8x3);
    resizer.resize(&src, &mut dst, &options)?;

    Ok(Array3::from_shape_vec(
        (target_h, target_w_total, 3),
        dst.buffer().to_vec(),
    )?)
}

pub fn to_fir_image<'a>(mut image: RgbImage) -> FirImage<'a> {
    let (width, height) = image.dimensions();
    let buffer = std::mem::take(&mut image).into_raw();

    FirImage::from_vec_u8(width, height, buffer, PixelType::U8x3)
        .expect("Failed to convert to FirImage")
}

/// Scales raw pixel values from 0-255 to 0-1.
pub fn to_unit_f32(seq: &Array3<u8>) -> Array3<f32> {
    seq.mapv(|v| v as f32 / 255.0)
}

/// Unpacks a side-by-side sequence `[H, W * seq, C]` into a channel stack
/// `[H, W, C * seq]`.
pub fn unpack_image_seq<T: Copy>(
    seq: &Array3<T>,
    img_width: usize,
    seq_length: usize,
) -> Result<Array3<T>> {
    let (_h, total_w, _c) = seq.dim();
    if total_w != img_width * seq_length {
        bail!(
            "Sequence width {} is not {} frames of width {}",
            total_w,
            seq_length,
            img_width
        );
    }

    let frames: Vec<_> = (0..seq_length)
        .map(|i| seq.slice(s![.., i * img_width..(i + 1) * img_width, ..]))
        .collect();
    Ok(ndarray::concatenate(Axis(2), &frames)?)
}

/// Mirrors a stack horizontally.
pub fn flip_stack<T: Copy>(stack: &Array3<T>) -> Array3<T> {
    stack.slice(s![.., ..;-1, ..]).to_owned()
}

/// Bilinear resize of a channel stack to `[new_h, new_w, C]`. Works for any
/// channel count, which rules out the typed-pixel resizer used at decode time.
pub fn resize_bilinear(stack: &Array3<f32>, new_h: usize, new_w: usize) -> Array3<f32> {
    let (h, w, c) = stack.dim();
    let sy = h as f32 / new_h as f32;
    let sx = w as f32 / new_w as f32;

    let mut out = Array3::<f32>::zeros((new_h, new_w, c));
    for y in 0..new_h {
        let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, (h - 1) as f32);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(h - 1);
        let wy = fy - y0 as f32;
        for x in 0..new_w {
            let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, (w - 1) as f32);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(w - 1);
            let wx = fx - x0 as f32;
            for ch in 0..c {
                let top = stack[[y0, x0, ch]] * (1.0 - wx) + stack[[y0, x1, ch]] * wx;
                let bottom = stack[[y1, x0, ch]] * (1.0 - wx) + stack[[y1, x1, ch]] * wx;
                out[[y, x, ch]] = top * (1.0 - wy) + bottom * wy;
            }
        }
    }
    out
}

/// Nearest-neighbour resize for label stacks.
pub fn resize_nearest(stack: &Array3<u8>, new_h: usize, new_w: usize) -> Array3<u8> {
    let (h, w, c) = stack.dim();
    let sy = h as f32 / new_h as f32;
    let sx = w as f32 / new_w as f32;

    let mut out = Array3::<u8>::zeros((new_h, new_w, c));
    for y in 0..new_h {
        let src_y = (((y as f32 + 0.5) * sy) as usize).min(h - 1);
        for x in 0..new_w {
            let src_x = (((x as f32 + 0.5) * sx) as usize).min(w - 1);
            for ch in 0..c {
                out[[y, x, ch]] = stack[[src_y, src_x, ch]];
            }
        }
    }
    out
}

/// Crops a `[h, w]` window out of a stack at the given offset.
pub fn crop_stack<T: Copy>(
    stack: &Array3<T>,
    offset_y: usize,
    offset_x: usize,
    h: usize,
    w: usize,
) -> Result<Array3<T>> {
    let (sh, sw, _c) = stack.dim();
    if offset_y + h > sh || offset_x + w > sw {
        bail!(
            "Crop window {}x{} at ({}, {}) exceeds stack {}x{}",
            w,
            h,
            offset_x,
            offset_y,
            sw,
            sh
        );
    }
    Ok(stack
        .slice(s![offset_y..offset_y + h, offset_x..offset_x + w, ..])
        .to_owned())
}

/// Normalizes by the Imagenet mean and standard deviation, tiled across
/// the stacked frames. This aligns training input with pretrained encoders.
pub fn normalize_imagenet(stack: &Array3<f32>, seq_length: usize) -> Result<Array3<f32>> {
    let (_h, _w, c) = stack.dim();
    if c != 3 * seq_length {
        bail!(
            "Expected a {}-channel stack for seq_length {}, got {} channels",
            3 * seq_length,
            seq_length,
            c
        );
    }

    let mut out = stack.clone();
    for ch in 0..c {
        let mean = IMAGENET_MEAN[ch % 3];
        let sd = IMAGENET_SD[ch % 3];
        out.slice_mut(s![.., .., ch]).mapv_inplace(|v| (v - mean) / sd);
    }
    Ok(out)
}

pub fn adjust_brightness(image: &mut Array3<f32>, delta: f32) {
    image.mapv_inplace(|v| v + delta);
}

/// Contrast stretch around the per-channel mean.
pub fn adjust_contrast(image: &mut Array3<f32>, factor: f32) {
    let (_h, _w, c) = image.dim();
    for ch in 0..c {
        let mean = image.slice(s![.., .., ch]).mean().unwrap_or(0.0);
        image
            .slice_mut(s![.., .., ch])
            .mapv_inplace(|v| (v - mean) * factor + mean);
    }
}

pub fn adjust_saturation(image: &mut Array3<f32>, factor: f32) -> Result<()> {
    for_each_pixel_hsv(image, |h, s, v| (h, (s * factor).clamp(0.0, 1.0), v))
}

/// `delta` is a fraction of the hue circle.
pub fn adjust_hue(image: &mut Array3<f32>, delta: f32) -> Result<()> {
    for_each_pixel_hsv(image, |h, s, v| ((h + delta).rem_euclid(1.0), s, v))
}

pub fn clip_unit(image: &mut Array3<f32>) {
    image.mapv_inplace(|v| v.clamp(0.0, 1.0));
}

fn for_each_pixel_hsv(
    image: &mut Array3<f32>,
    f: impl Fn(f32, f32, f32) -> (f32, f32, f32),
) -> Result<()> {
    let (height, width, c) = image.dim();
    if c != 3 {
        bail!("Colorspace adjustments expect a 3-channel image, got {} channels", c);
    }

    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = (image[[y, x, 0]], image[[y, x, 1]], image[[y, x, 2]]);
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (h, s, v) = f(h, s, v);
            let (r, g, b) = hsv_to_rgb(h, s, v);
            image[[y, x, 0]] = r;
            image[[y, x, 1]] = g;
            image[[y, x, 2]] = b;
        }
    }
    Ok(())
}

// Hue is kept in [0, 1) rather than degrees.
fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let c = v * s;
    let x = c * (1.0 - (h6 % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h6 as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r + m, g + m, b + m)
}
