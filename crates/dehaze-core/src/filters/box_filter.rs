use ndarray::{Array2, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Summed-area table with a zero first row and column, shape = (h + 1, w + 1).
pub fn integral_image(data: &Array2<f64>) -> Array2<f64> {
    let (h, w) = data.dim();
    let mut integral = Array2::<f64>::zeros((h + 1, w + 1));
    for row in 0..h {
        let mut row_sum = 0.0;
        for col in 0..w {
            row_sum += data[[row, col]];
            integral[[row + 1, col + 1]] = integral[[row, col + 1]] + row_sum;
        }
    }
    integral
}

/// Local mean over a `(2 * radius + 1)` square window.
///
/// Windows are clipped at the borders and divided by the number of pixels actually
/// covered, so a constant map stays constant. O(h * w) regardless of radius.
pub fn box_mean(data: &Array2<f64>, radius: usize) -> Array2<f64> {
    let (h, w) = data.dim();
    let integral = integral_image(data);
    let mut out = Array2::<f64>::zeros((h, w));

    let mean_at = |(row, col): (usize, usize), v: &mut f64| {
        let r0 = row.saturating_sub(radius);
        let r1 = (row + radius + 1).min(h);
        let c0 = col.saturating_sub(radius);
        let c1 = (col + radius + 1).min(w);
        let sum = integral[[r1, c1]] - integral[[r0, c1]] - integral[[r1, c0]]
            + integral[[r0, c0]];
        *v = sum / ((r1 - r0) * (c1 - c0)) as f64;
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        Zip::indexed(&mut out).par_for_each(mean_at);
    } else {
        Zip::indexed(&mut out).for_each(mean_at);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_of_ones_counts_pixels() {
        let integral = integral_image(&Array2::from_elem((3, 4), 1.0));
        assert_eq!(integral[[3, 4]], 12.0);
        assert_eq!(integral[[2, 3]], 6.0);
        assert_eq!(integral[[0, 2]], 0.0);
    }

    #[test]
    fn box_mean_clips_at_borders() {
        let data = Array2::from_shape_vec((1, 3), vec![0.0, 3.0, 6.0]).unwrap();
        let mean = box_mean(&data, 1);
        assert!((mean[[0, 0]] - 1.5).abs() < 1e-12);
        assert!((mean[[0, 1]] - 3.0).abs() < 1e-12);
        assert!((mean[[0, 2]] - 4.5).abs() < 1e-12);
    }

    #[test]
    fn box_mean_radius_zero_is_identity() {
        let data = Array2::from_shape_fn((4, 5), |(r, c)| (r * 5 + c) as f64);
        assert_eq!(box_mean(&data, 0), data);
    }

    #[test]
    fn box_mean_parallel_path_matches_direct_sum() {
        // 260 x 260 is above PARALLEL_PIXEL_THRESHOLD.
        let (h, w, radius) = (260, 260, 2);
        let data = Array2::from_shape_fn((h, w), |(r, c)| ((r * 31 + c * 17) % 97) as f64);
        let mean = box_mean(&data, radius);
        for row in 0..h {
            for col in 0..w {
                let rows = row.saturating_sub(radius)..(row + radius + 1).min(h);
                let cols = col.saturating_sub(radius)..(col + radius + 1).min(w);
                let count = (rows.len() * cols.len()) as f64;
                let sum: f64 = rows
                    .flat_map(|r| cols.clone().map(move |c| (r, c)))
                    .map(|(r, c)| data[[r, c]])
                    .sum();
                assert!((mean[[row, col]] - sum / count).abs() < 1e-9);
            }
        }
    }
}
