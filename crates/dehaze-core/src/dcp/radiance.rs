use ndarray::{Array3, ArrayView1, ArrayViewMut1, Axis, Zip};

use crate::consts::{MIN_TRANSMISSION, PARALLEL_PIXEL_THRESHOLD};
use crate::dcp::atmosphere::Airlight;
use crate::error::{DehazeError, Result};
use crate::frame::{Frame, RgbFrame};

/// Invert the haze model: `J = (I - A) / max(t, t_floor) + A`.
///
/// One transmission value per pixel is shared by all three channels. `t_floor` is
/// itself raised to `MIN_TRANSMISSION`, so a zero in the map never divides. Values are
/// left unclamped and may fall outside [0, 255].
pub fn recover_radiance(
    image: &RgbFrame,
    airlight: &Airlight,
    transmission: &Frame,
    t_floor: f32,
) -> Result<RgbFrame> {
    if image.dim() != transmission.dim() {
        return Err(DehazeError::ShapeMismatch {
            expected: image.dim(),
            actual: transmission.dim(),
        });
    }

    let floor = if t_floor.is_finite() {
        t_floor.max(MIN_TRANSMISSION)
    } else {
        MIN_TRANSMISSION
    };
    let a = airlight.components();
    let mut out = Array3::<f32>::zeros(image.data.dim());

    let zip = Zip::from(out.lanes_mut(Axis(2)))
        .and(image.data.lanes(Axis(2)))
        .and(&transmission.data);
    let invert = |mut j: ArrayViewMut1<f32>, i: ArrayView1<f32>, &t: &f32| {
        let t = t.max(floor);
        for c in 0..a.len() {
            j[c] = (i[c] - a[c]) / t + a[c];
        }
    };
    if image.pixel_count() >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(invert);
    } else {
        zip.for_each(invert);
    }

    RgbFrame::new(out)
}
