#![allow(dead_code)]

use dehaze_core::frame::RgbFrame;
use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Image whose three channels all equal `rows`.
pub fn replicated_image(rows: &[&[f32]]) -> RgbFrame {
    let h = rows.len();
    let w = rows[0].len();
    let gray = Array2::from_shape_fn((h, w), |(r, c)| rows[r][c]);
    RgbFrame::from_gray(&gray).expect("non-empty image")
}

pub fn uniform_image(h: usize, w: usize, value: f32) -> RgbFrame {
    RgbFrame::new(Array3::from_elem((h, w, 3), value)).expect("non-empty image")
}

/// Integer-valued random samples in [0, 255], deterministic per seed.
pub fn random_image(h: usize, w: usize, seed: u64) -> RgbFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = Array3::from_shape_fn((h, w, 3), |_| rng.random_range(0..=255u8) as f32);
    RgbFrame::new(data).expect("non-empty image")
}

/// Random image with the blue channel forced to zero, so its dark channel is zero
/// everywhere (no haze).
pub fn haze_free_image(h: usize, w: usize, seed: u64) -> RgbFrame {
    let mut frame = random_image(h, w, seed);
    frame.data.index_axis_mut(ndarray::Axis(2), 2).fill(0.0);
    frame
}

/// Flat indices sorted by descending value, ties by ascending index; first `count`.
pub fn brute_force_ranking(dark: &Array2<f32>, count: usize) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..dark.len()).collect();
    let flat: Vec<f32> = dark.iter().copied().collect();
    idx.sort_by(|&a, &b| flat[b].partial_cmp(&flat[a]).unwrap().then(a.cmp(&b)));
    idx.truncate(count);
    idx
}

/// Per-channel maximum of `image` over the given flat indices.
pub fn brute_force_airlight(image: &RgbFrame, indices: &[usize]) -> [f32; 3] {
    let w = image.width();
    let mut a = [f32::NEG_INFINITY; 3];
    for &i in indices {
        for (c, v) in a.iter_mut().enumerate() {
            *v = v.max(image.data[[i / w, i % w, c]]);
        }
    }
    a
}

/// Write an RGB frame to `path` as an 8-bit PNG.
pub fn write_png(frame: &RgbFrame, path: &std::path::Path) {
    let img = dehaze_core::io::image_io::quantize_rgb(frame);
    img.save(path).expect("write test png");
}
