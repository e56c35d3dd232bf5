use ndarray::Array1;
use tracing::debug;

use crate::dcp::atmosphere::Airlight;
use crate::dcp::dark_channel::dark_channel;
use crate::error::{DehazeError, Result};
use crate::filters::guided::{
    guided_filter_color, guided_filter_gray, luminance, normalize_guide, GuideMode,
};
use crate::frame::{Frame, RgbFrame};

/// Raw transmission `t = 1 - omega * dark(I / A)`.
///
/// Every airlight component must be positive and finite; the pipeline floors the
/// airlight before calling this.
pub fn estimate_transmission(
    image: &RgbFrame,
    airlight: &Airlight,
    window: usize,
    omega: f32,
) -> Result<Frame> {
    if airlight.is_degenerate() {
        return Err(DehazeError::DegenerateAirlight(airlight.components()));
    }

    let a = Array1::from(airlight.components().to_vec());
    let normalized = &image.data / &a;
    let dark = dark_channel(&normalized, window);

    Ok(Frame::new(dark.mapv(|d| 1.0 - omega * d)))
}

/// Raise every transmission value to at least `tmin`.
pub fn floor_transmission(transmission: &Frame, tmin: f32) -> Frame {
    Frame::new(transmission.data.mapv(|t| t.max(tmin)))
}

/// Clamp a transmission map to `[lo, hi]`. Requires `lo <= hi`.
pub fn clamp_transmission(transmission: &Frame, lo: f32, hi: f32) -> Frame {
    Frame::new(transmission.data.mapv(|t| t.clamp(lo, hi)))
}

/// Smooth a transmission map along the edges of `image` with a guided filter.
///
/// The guide is `image` rescaled to [0, 1]. The result is not clamped.
pub fn refine_transmission(
    image: &RgbFrame,
    transmission: &Frame,
    radius: usize,
    eps: f32,
    mode: GuideMode,
) -> Result<Frame> {
    let guide = normalize_guide(image);
    let refined = match mode {
        GuideMode::Color => guided_filter_color(&guide, &transmission.data, radius, eps)?,
        GuideMode::Luminance => {
            guided_filter_gray(&luminance(&guide), &transmission.data, radius, eps)?
        }
    };

    let refined = Frame::new(refined);
    let (lo, hi) = refined.min_max();
    debug!(radius, eps, %mode, lo, hi, "Refined transmission");
    Ok(refined)
}
