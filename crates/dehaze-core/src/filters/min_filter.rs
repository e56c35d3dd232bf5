use std::collections::VecDeque;

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip};
use num_traits::Float;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Sliding-window minimum of a 2D map with edge replication.
///
/// `out[i, j]` is the minimum of `data` over rows `i - window/2 .. i - window/2 + window`
/// and the same column range, indices clamped to the map. For odd windows this is the
/// centred `window x window` square; for even windows the extra sample lies before the
/// centre. Output shape always equals input shape.
///
/// Separable: a row pass followed by a column pass, each O(n) per lane thanks to a
/// monotonic deque, so the cost does not depend on `window`. A `window` of 0 is treated as 1.
pub fn min_filter<T>(data: &Array2<T>, window: usize) -> Array2<T>
where
    T: Float + Send + Sync,
{
    let window = window.max(1);
    if window == 1 {
        return data.clone();
    }
    let rows = filter_lanes(data, window, Axis(1));
    filter_lanes(&rows, window, Axis(0))
}

fn filter_lanes<T>(data: &Array2<T>, window: usize, axis: Axis) -> Array2<T>
where
    T: Float + Send + Sync,
{
    let mut out = Array2::from_elem(data.dim(), T::zero());
    let run = |mut dst: ArrayViewMut1<T>, src: ArrayView1<T>| {
        let owned;
        let src = match src.as_slice() {
            Some(s) => s,
            None => {
                owned = src.to_vec();
                &owned[..]
            }
        };
        match dst.as_slice_mut() {
            Some(d) => sliding_min(src, window, d),
            None => {
                let mut buf = vec![T::zero(); src.len()];
                sliding_min(src, window, &mut buf);
                dst.assign(&ArrayView1::from(&buf[..]));
            }
        }
    };

    let zip = Zip::from(out.lanes_mut(axis)).and(data.lanes(axis));
    if data.len() >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(run);
    } else {
        zip.for_each(run);
    }
    out
}

/// 1D sliding minimum over the edge-replicated sequence.
///
/// The padded sequence has `window / 2` copies of the first sample in front and enough
/// copies of the last sample behind; `dst[i]` is the minimum of padded positions
/// `i .. i + window`.
fn sliding_min<T: Float>(src: &[T], window: usize, dst: &mut [T]) {
    let n = src.len();
    if n == 0 {
        return;
    }
    let half = window / 2;
    let sample = |padded: usize| src[padded.saturating_sub(half).min(n - 1)];

    // Padded indices whose samples are strictly increasing from front to back.
    let mut deque: VecDeque<usize> = VecDeque::with_capacity(window.min(n + half + 1));
    for j in 0..n + window - 1 {
        let v = sample(j);
        while let Some(&back) = deque.back() {
            if sample(back) >= v {
                deque.pop_back();
            } else {
                break;
            }
        }
        deque.push_back(j);

        if j + 1 >= window {
            let start = j + 1 - window;
            while let Some(&front) = deque.front() {
                if front < start {
                    deque.pop_front();
                } else {
                    break;
                }
            }
            if let Some(&front) = deque.front() {
                dst[start] = sample(front);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute(src: &[f32], window: usize) -> Vec<f32> {
        let n = src.len() as isize;
        let half = (window / 2) as isize;
        (0..n)
            .map(|i| {
                (0..window as isize)
                    .map(|k| src[(i - half + k).clamp(0, n - 1) as usize])
                    .fold(f32::INFINITY, f32::min)
            })
            .collect()
    }

    #[test]
    fn sliding_min_matches_brute_force() {
        let src = [5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 2.0, 7.0, 4.0];
        for window in 1..=12 {
            let mut dst = vec![0.0; src.len()];
            sliding_min(&src, window, &mut dst);
            assert_eq!(dst, brute(&src, window), "window {window}");
        }
    }

    #[test]
    fn min_filter_runs_both_lane_directions() {
        let data = Array2::from_shape_fn((5, 6), |(r, c)| ((r * 7 + c * 3) % 11) as f32);
        let out = min_filter(&data, 3);
        for r in 0..5usize {
            for c in 0..6usize {
                let mut expected = f32::INFINITY;
                for rr in r.saturating_sub(1)..=(r + 1).min(4) {
                    for cc in c.saturating_sub(1)..=(c + 1).min(5) {
                        expected = expected.min(data[[rr, cc]]);
                    }
                }
                assert_eq!(out[[r, c]], expected, "({r}, {c})");
            }
        }
    }

    #[test]
    fn sliding_min_single_sample() {
        let mut dst = [0.0f32];
        sliding_min(&[3.5], 7, &mut dst);
        assert_eq!(dst[0], 3.5);
    }

    #[test]
    fn even_window_reaches_one_sample_further_back() {
        // window 2 covers offsets [-1, 0]
        let src = [4.0f32, 1.0, 6.0, 6.0];
        let mut dst = vec![0.0; 4];
        sliding_min(&src, 2, &mut dst);
        assert_eq!(dst, vec![4.0, 1.0, 1.0, 6.0]);
    }
}
