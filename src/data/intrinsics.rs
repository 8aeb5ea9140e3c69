//! Camera calibration matrix and the adjustments the augmentation
//! stages apply to it.
//!
//! Stored as the four camera essentials (fx, fy, cx, cy); the skewless
//! 3x3 matrix and its inverse are derived on demand.

use anyhow::Result;
use ndarray::{array, s, Array2, Array3};

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Intrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Intrinsics {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Parses a 9-value `*_cam.csv` row (row-major 3x3 matrix).
    pub fn from_csv_row(row: &str) -> Result<Self> {
        let values = row
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()?;
        if values.len() != 9 {
            anyhow::bail!("Expected 9 intrinsics values, got {}", values.len());
        }
        Ok(Self {
            fx: values[0],
            fy: values[4],
            cx: values[2],
            cy: values[5],
        })
    }

    pub fn to_matrix(&self) -> Array2<f32> {
        array![
            [self.fx, 0.0, self.cx],
            [0.0, self.fy, self.cy],
            [0.0, 0.0, 1.0],
        ]
    }

    pub fn from_matrix(m: &Array2<f32>) -> Result<Self> {
        if m.shape() != [3, 3] {
            anyhow::bail!("Expected a 3x3 intrinsics matrix, got {:?}", m.shape());
        }
        Ok(Self {
            fx: m[[0, 0]],
            fy: m[[1, 1]],
            cx: m[[0, 2]],
            cy: m[[1, 2]],
        })
    }

    /// Closed-form inverse of the calibration matrix.
    pub fn inverse_matrix(&self) -> Array2<f32> {
        array![
            [1.0 / self.fx, 0.0, -self.cx / self.fx],
            [0.0, 1.0 / self.fy, -self.cy / self.fy],
            [0.0, 0.0, 1.0],
        ]
    }

    /// Focal lengths and principal point follow an image resize.
    pub fn scaled(&self, x_scaling: f32, y_scaling: f32) -> Self {
        Self {
            fx: self.fx * x_scaling,
            fy: self.fy * y_scaling,
            cx: self.cx * x_scaling,
            cy: self.cy * y_scaling,
        }
    }

    /// Principal point follows a crop at the given pixel offset.
    pub fn cropped(&self, offset_x: f32, offset_y: f32) -> Self {
        Self {
            fx: self.fx,
            fy: self.fy,
            cx: self.cx - offset_x,
            cy: self.cy - offset_y,
        }
    }

    /// Mirrors the horizontal principal point for a left-right flipped image.
    pub fn flipped(&self, image_width: f32) -> Self {
        Self {
            fx: self.fx,
            fy: self.fy,
            cx: image_width - self.cx,
            cy: self.cy,
        }
    }

    /// Intrinsics at pyramid level `s`: all four essentials divided by 2^s.
    pub fn at_scale(&self, s: usize) -> Self {
        let factor = (1u32 << s) as f32;
        Self {
            fx: self.fx / factor,
            fy: self.fy / factor,
            cx: self.cx / factor,
            cy: self.cy / factor,
        }
    }

    /// Stacks the per-level matrices into a `[num_scales, 3, 3]` tensor.
    pub fn multi_scale(&self, num_scales: usize) -> Array3<f32> {
        let mut out = Array3::<f32>::zeros((num_scales, 3, 3));
        for level in 0..num_scales {
            out.slice_mut(s![level, .., ..])
                .assign(&self.at_scale(level).to_matrix());
        }
        out
    }

    /// Stacks the per-level inverse matrices into a `[num_scales, 3, 3]` tensor.
    pub fn multi_scale_inverse(&self, num_scales: usize) -> Array3<f32> {
        let mut out = Array3::<f32>::zeros((num_scales, 3, 3));
        for level in 0..num_scales {
            out.slice_mut(s![level, .., ..])
                .assign(&self.at_scale(level).inverse_matrix());
        }
        out
    }
}
