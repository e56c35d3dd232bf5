mod common;

use approx::assert_abs_diff_eq;
use ndarray::{s, Array2, Array3};

use dehaze_core::consts::MIN_TRANSMISSION;
use dehaze_core::dcp::{recover_radiance, Airlight};
use dehaze_core::error::DehazeError;
use dehaze_core::frame::{Frame, RgbFrame};

use common::{random_image, uniform_image};

#[test]
fn test_unit_transmission_returns_input() {
    let image = random_image(10, 10, 1);
    let t = Frame::new(Array2::ones((10, 10)));
    let j = recover_radiance(&image, &Airlight([220.0, 210.0, 200.0]), &t, 0.1).unwrap();
    assert_eq!(j, image);
}

#[test]
fn test_known_value() {
    let image = uniform_image(2, 2, 150.0);
    let t = Frame::new(Array2::from_elem((2, 2), 0.5));
    let j = recover_radiance(&image, &Airlight([200.0, 200.0, 200.0]), &t, 0.1).unwrap();
    for &v in j.data.iter() {
        assert_abs_diff_eq!(v, 100.0, epsilon = 1e-4);
    }
}

#[test]
fn test_transmission_shared_across_channels() {
    let mut data = Array3::zeros((1, 1, 3));
    data[[0, 0, 0]] = 100.0;
    data[[0, 0, 1]] = 150.0;
    data[[0, 0, 2]] = 200.0;
    let image = RgbFrame::new(data).unwrap();
    let t = Frame::new(Array2::from_elem((1, 1), 0.25));
    let a = Airlight([200.0, 200.0, 200.0]);
    let j = recover_radiance(&image, &a, &t, 0.1).unwrap();
    assert_abs_diff_eq!(j.data[[0, 0, 0]], -200.0, epsilon = 1e-3);
    assert_abs_diff_eq!(j.data[[0, 0, 1]], 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(j.data[[0, 0, 2]], 200.0, epsilon = 1e-3);
}

#[test]
fn test_floor_applied_by_recoverer() {
    let image = uniform_image(3, 3, 100.0);
    let t = Frame::new(Array2::from_elem((3, 3), 0.05));
    let a = Airlight([200.0, 200.0, 200.0]);
    let j = recover_radiance(&image, &a, &t, 0.5).unwrap();
    for &v in j.data.iter() {
        assert_abs_diff_eq!(v, 0.0, epsilon = 1e-3);
    }
}

#[test]
fn test_zero_transmission_stays_finite() {
    let image = random_image(4, 4, 2);
    let t = Frame::new(Array2::zeros((4, 4)));
    let a = Airlight([220.0, 220.0, 220.0]);
    for floor in [0.0, -1.0, f32::NAN] {
        let j = recover_radiance(&image, &a, &t, floor).unwrap();
        assert!(j.data.iter().all(|v| v.is_finite()), "floor {floor}");
    }
    let j = recover_radiance(&image, &a, &t, 0.0).unwrap();
    let expected = (image.data[[0, 0, 0]] - 220.0) / MIN_TRANSMISSION + 220.0;
    assert_abs_diff_eq!(j.data[[0, 0, 0]], expected, epsilon = 1e-1);
}

#[test]
fn test_inverts_synthetic_haze() {
    let clear = random_image(12, 12, 3);
    let a = [230.0f32, 220.0, 210.0];
    let t = Array2::from_shape_fn((12, 12), |(r, c)| 0.3 + 0.05 * ((r + c) % 10) as f32);
    let mut hazy = clear.data.clone();
    for ((r, c, ch), v) in hazy.indexed_iter_mut() {
        *v = *v * t[[r, c]] + a[ch] * (1.0 - t[[r, c]]);
    }
    let hazy = RgbFrame::new(hazy).unwrap();
    let j = recover_radiance(&hazy, &Airlight(a), &Frame::new(t), 0.1).unwrap();
    for (got, want) in j.data.iter().zip(clear.data.iter()) {
        assert_abs_diff_eq!(*got, *want, epsilon = 1e-2);
    }
}

#[test]
fn test_shape_mismatch_rejected() {
    let image = uniform_image(4, 4, 1.0);
    let t = Frame::new(Array2::ones((3, 4)));
    assert!(matches!(
        recover_radiance(&image, &Airlight([1.0, 1.0, 1.0]), &t, 0.1),
        Err(DehazeError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_parallel_path_matches_row_tiles() {
    // The whole 300 x 300 image runs in parallel; 100-row tiles stay sequential.
    let image = random_image(300, 300, 60);
    let t = Frame::new(Array2::from_shape_fn((300, 300), |(r, c)| {
        0.05 + ((r * 13 + c * 7) % 90) as f32 / 100.0
    }));
    let airlight = Airlight([210.0, 190.0, 230.0]);
    let whole = recover_radiance(&image, &airlight, &t, 0.1).unwrap();

    for tile in 0..3 {
        let (r0, r1) = (tile * 100, (tile + 1) * 100);
        let image_tile = RgbFrame::new(image.data.slice(s![r0..r1, .., ..]).to_owned()).unwrap();
        let t_tile = Frame::new(t.data.slice(s![r0..r1, ..]).to_owned());
        let part = recover_radiance(&image_tile, &airlight, &t_tile, 0.1).unwrap();
        assert_eq!(part.data, whole.data.slice(s![r0..r1, .., ..]));
    }
}

