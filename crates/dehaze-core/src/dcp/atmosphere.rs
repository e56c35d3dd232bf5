use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{DehazeError, Result};
use crate::frame::{Frame, RgbFrame};

/// Global atmospheric light, one intensity per channel (R, G, B).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Airlight(pub [f32; COLOR_CHANNEL_COUNT]);

impl Airlight {
    /// Cap every component at `max`.
    pub fn capped(self, max: f32) -> Self {
        Self(self.0.map(|v| v.min(max)))
    }

    /// Raise every component to at least `min`.
    pub fn floored(self, min: f32) -> Self {
        Self(self.0.map(|v| v.max(min)))
    }

    /// True if any component is zero, negative or not finite.
    pub fn is_degenerate(&self) -> bool {
        self.0.iter().any(|v| !(v.is_finite() && *v > 0.0))
    }

    pub fn components(&self) -> [f32; COLOR_CHANNEL_COUNT] {
        self.0
    }
}

impl std::fmt::Display for Airlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.0[0], self.0[1], self.0[2])
    }
}

/// Number of pixels searched for the airlight: `round(pixels * percentile)`,
/// half-way cases rounded to even, at least 1 and at most `pixels`.
pub fn candidate_count(pixels: usize, percentile: f64) -> usize {
    let wanted = (pixels as f64 * percentile).round_ties_even();
    if !(wanted >= 1.0) {
        return pixels.min(1);
    }
    (wanted as usize).min(pixels)
}

/// Descending dark value, then ascending flat index. A total order, so the selected
/// set is fully determined even when many pixels share a value.
fn brightest_first(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Row-major flat indices of the `candidate_count` pixels with the highest dark-channel
/// value, brightest first.
pub fn brightest_pixels(dark: &Frame, percentile: f64) -> Vec<usize> {
    let count = candidate_count(dark.data.len(), percentile);
    let mut indexed: Vec<(usize, f32)> = dark.data.iter().copied().enumerate().collect();

    if count == 0 {
        return Vec::new();
    }
    if count < indexed.len() {
        indexed.select_nth_unstable_by(count - 1, brightest_first);
        indexed.truncate(count);
    }
    indexed.sort_unstable_by(brightest_first);
    indexed.into_iter().map(|(i, _)| i).collect()
}

/// Estimate the airlight from the haziest region.
///
/// Takes the brightest `percentile` of the dark channel and returns, for each channel
/// independently, the largest intensity of `image` among those pixels.
pub fn estimate_airlight(image: &RgbFrame, dark: &Frame, percentile: f64) -> Result<Airlight> {
    if image.dim() != dark.dim() {
        return Err(DehazeError::ShapeMismatch {
            expected: image.dim(),
            actual: dark.dim(),
        });
    }

    let width = image.width();
    let candidates = brightest_pixels(dark, percentile);
    let mut airlight = [f32::NEG_INFINITY; COLOR_CHANNEL_COUNT];
    for &flat in &candidates {
        let (row, col) = (flat / width, flat % width);
        for (c, a) in airlight.iter_mut().enumerate() {
            *a = a.max(image.data[[row, col, c]]);
        }
    }

    debug!(candidates = candidates.len(), ?airlight, "Airlight search");
    Ok(Airlight(airlight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_count_rounds_half_to_even() {
        assert_eq!(candidate_count(16, 0.25), 4);
        assert_eq!(candidate_count(10, 0.25), 2); // 2.5
        assert_eq!(candidate_count(14, 0.25), 4); // 3.5
        assert_eq!(candidate_count(1000, 0.001), 1);
    }

    #[test]
    fn candidate_count_is_at_least_one() {
        assert_eq!(candidate_count(100, 0.001), 1);
        assert_eq!(candidate_count(1, 0.5), 1);
    }

    #[test]
    fn candidate_count_never_exceeds_pixels() {
        assert_eq!(candidate_count(9, 1.0), 9);
    }

    #[test]
    fn airlight_cap_and_floor() {
        let a = Airlight([250.0, 0.0, 100.0]);
        assert_eq!(a.capped(220.0).0, [220.0, 0.0, 100.0]);
        assert!(a.is_degenerate());
        assert!(!a.floored(1e-3).is_degenerate());
    }
}
