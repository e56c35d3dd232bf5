use ndarray::{Array2, Array3, Axis};
use std::path::PathBuf;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{DehazeError, Result};

/// A single-channel map: dark channel or transmission.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Row-major data, shape = (height, width)
    pub data: Array2<f32>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// (min, max) over all pixels. `(inf, -inf)` for an empty frame.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    pub fn mean(&self) -> f32 {
        self.data.mean().unwrap_or(0.0)
    }
}

/// An RGB image with `f32` samples, shape = (height, width, 3).
///
/// Samples decoded from 8-bit files are in [0.0, 255.0]; intermediate images
/// (for instance an image divided by its airlight) can hold any float value.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbFrame {
    pub data: Array3<f32>,
}

impl RgbFrame {
    /// Wrap an (h, w, 3) array, rejecting other channel counts and empty images.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != COLOR_CHANNEL_COUNT || h == 0 || w == 0 {
            return Err(DehazeError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        Ok(Self { data })
    }

    /// Build an image where all three channels are copies of `gray`.
    pub fn from_gray(gray: &Array2<f32>) -> Result<Self> {
        let (h, w) = gray.dim();
        let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, _)| {
            gray[[row, col]]
        });
        Self::new(data)
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Spatial shape (height, width).
    pub fn dim(&self) -> (usize, usize) {
        let (h, w, _) = self.data.dim();
        (h, w)
    }

    pub fn pixel_count(&self) -> usize {
        self.height() * self.width()
    }

    /// Owned copy of one channel.
    pub fn channel(&self, index: usize) -> Array2<f32> {
        self.data.index_axis(Axis(2), index).to_owned()
    }

    /// (min, max) over every sample of every channel.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Metadata about a decoded source image.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub width: u32,
    pub height: u32,
}
