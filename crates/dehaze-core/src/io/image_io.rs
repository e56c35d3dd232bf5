use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use ndarray::{Array2, Array3};

use crate::consts::{COLOR_CHANNEL_COUNT, MAX_INTENSITY};
use crate::error::{DehazeError, Result};
use crate::frame::{RgbFrame, SourceInfo};

/// Clamp to [0, 255] and truncate to a byte. NaN maps to 0.
pub fn quantize(value: f32) -> u8 {
    value.clamp(0.0, MAX_INTENSITY) as u8
}

/// Promote an 8-bit RGB raster to an `f32` frame in [0.0, 255.0].
pub fn rgb_frame_from_image(img: &RgbImage) -> Result<RgbFrame> {
    let (w, h) = img.dimensions();
    let data = Array3::from_shape_fn(
        (h as usize, w as usize, COLOR_CHANNEL_COUNT),
        |(row, col, c)| img.get_pixel(col as u32, row as u32).0[c] as f32,
    );
    RgbFrame::new(data)
}

/// Decode any format the `image` crate understands into an RGB frame.
pub fn load_rgb_image(path: &Path) -> Result<RgbFrame> {
    load_rgb_image_with_info(path).map(|(frame, _)| frame)
}

/// Decode an image and report its source metadata.
pub fn load_rgb_image_with_info(path: &Path) -> Result<(RgbFrame, SourceInfo)> {
    let img = image::open(path).map_err(|source| DehazeError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = img.to_rgb8();
    let info = SourceInfo {
        filename: path.to_path_buf(),
        width: rgb.width(),
        height: rgb.height(),
    };
    Ok((rgb_frame_from_image(&rgb)?, info))
}

/// Quantize a single-channel map after multiplying it by `scale`.
///
/// Transmission maps in (0, 1] use `scale = 255.0`; the dark channel is already on the
/// intensity scale and uses 1.0.
pub fn quantize_gray(data: &Array2<f32>, scale: f32) -> GrayImage {
    let (h, w) = data.dim();
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([quantize(data[[y as usize, x as usize]] * scale)])
    })
}

/// Quantize an RGB frame to an 8-bit raster.
pub fn quantize_rgb(frame: &RgbFrame) -> RgbImage {
    let (h, w) = frame.dim();
    RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let (row, col) = (y as usize, x as usize);
        Rgb([
            quantize(frame.data[[row, col, 0]]),
            quantize(frame.data[[row, col, 1]]),
            quantize(frame.data[[row, col, 2]]),
        ])
    })
}

/// Save an 8-bit raster as PNG.
pub fn save_png(img: &DynamicImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
