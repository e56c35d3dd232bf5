use ndarray::{Array2, Array3, Axis};
use num_traits::Float;

use crate::filters::min_filter::min_filter;
use crate::frame::{Frame, RgbFrame};

/// Per-pixel minimum across the channel axis of an (h, w, c) array.
pub fn channel_minimum<T: Float>(image: &Array3<T>) -> Array2<T> {
    image.map_axis(Axis(2), |px| px.iter().fold(T::infinity(), |m, &v| m.min(v)))
}

/// Dark channel of an (h, w, c) image.
///
/// Minimum over all channels and over a `window x window` neighbourhood, the image
/// being padded by replicating its border samples. Output shape is (h, w) for every
/// window size. Works on any float image, not only the 0..=255 range.
pub fn dark_channel<T>(image: &Array3<T>, window: usize) -> Array2<T>
where
    T: Float + Send + Sync,
{
    min_filter(&channel_minimum(image), window)
}

/// Brute-force dark channel, one full window scan per pixel.
///
/// O(h * w * window^2 * c). Reference for [`dark_channel`], which must agree with it
/// exactly.
pub fn dark_channel_naive<T: Float>(image: &Array3<T>, window: usize) -> Array2<T> {
    let (h, w, c) = image.dim();
    let window = window.max(1) as isize;
    let half = window / 2;
    let (hi, wi) = (h as isize, w as isize);

    Array2::from_shape_fn((h, w), |(row, col)| {
        let mut min = T::infinity();
        for dr in 0..window {
            let r = (row as isize - half + dr).clamp(0, hi - 1) as usize;
            for dc in 0..window {
                let cc = (col as isize - half + dc).clamp(0, wi - 1) as usize;
                for ch in 0..c {
                    min = min.min(image[[r, cc, ch]]);
                }
            }
        }
        min
    })
}

/// Dark channel of an RGB frame.
pub fn dark_channel_frame(image: &RgbFrame, window: usize) -> Frame {
    Frame::new(dark_channel(&image.data, window))
}
