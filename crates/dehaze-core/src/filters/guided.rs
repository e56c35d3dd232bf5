use ndarray::{Array2, Array3, ArrayView1, ArrayViewMut1, Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::consts::{EPSILON, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{DehazeError, Result};
use crate::filters::box_filter::box_mean;
use crate::frame::RgbFrame;

/// Which form of the image steers the guided filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideMode {
    /// All three channels, with a per-pixel 3x3 covariance.
    #[default]
    Color,
    /// BT.601 luminance of the image, scalar filter.
    Luminance,
}

impl std::fmt::Display for GuideMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Color => write!(f, "Color"),
            Self::Luminance => write!(f, "Luminance"),
        }
    }
}

/// Rescale every sample to [0, 1] using the global min/max over all channels.
///
/// A constant image has no range to stretch and maps to all zeros.
pub fn normalize_guide(image: &RgbFrame) -> Array3<f32> {
    let (lo, hi) = image.min_max();
    let range = hi - lo;
    if !range.is_finite() || range.abs() < EPSILON {
        return Array3::zeros(image.data.dim());
    }
    image.data.mapv(|v| (v - lo) / range)
}

/// BT.601 luminance of an (h, w, 3) array.
pub fn luminance(data: &Array3<f32>) -> Array2<f32> {
    data.map_axis(Axis(2), |px| {
        LUMINANCE_R * px[0] + LUMINANCE_G * px[1] + LUMINANCE_B * px[2]
    })
}

fn check_filter_args(guide: (usize, usize), input: (usize, usize), eps: f32) -> Result<()> {
    if guide != input {
        return Err(DehazeError::ShapeMismatch {
            expected: input,
            actual: guide,
        });
    }
    if !(eps > 0.0 && eps.is_finite()) {
        return Err(DehazeError::InvalidConfig(format!(
            "guided filter eps must be positive, got {eps}"
        )));
    }
    Ok(())
}

/// Guided filter with a single-channel guide (He et al., 2010).
///
/// Within every `(2r + 1)^2` window the output is `a * guide + b`, where
/// `a = cov(guide, input) / (var(guide) + eps)`. Coefficients are averaged over all
/// windows covering a pixel.
pub fn guided_filter_gray(
    guide: &Array2<f32>,
    input: &Array2<f32>,
    radius: usize,
    eps: f32,
) -> Result<Array2<f32>> {
    check_filter_args(guide.dim(), input.dim(), eps)?;
    let eps = eps as f64;

    let g = guide.mapv(f64::from);
    let p = input.mapv(f64::from);

    let mean_g = box_mean(&g, radius);
    let mean_p = box_mean(&p, radius);
    let corr_gp = box_mean(&(&g * &p), radius);
    let corr_gg = box_mean(&(&g * &g), radius);

    let cov_gp = &corr_gp - &(&mean_g * &mean_p);
    let var_g = &corr_gg - &(&mean_g * &mean_g);

    let a = Zip::from(&cov_gp)
        .and(&var_g)
        .map_collect(|&cov, &var| cov / (var + eps));
    let b = &mean_p - &(&a * &mean_g);

    let mean_a = box_mean(&a, radius);
    let mean_b = box_mean(&b, radius);

    Ok(Zip::from(&mean_a)
        .and(&mean_b)
        .and(&g)
        .map_collect(|&ma, &mb, &gv| (ma * gv + mb) as f32))
}

/// Guided filter with a three-channel guide.
///
/// Same local linear model as [`guided_filter_gray`], with `a` a 3-vector solved from
/// `(Sigma + eps * U)^-1 * cov(guide, input)`, Sigma being the per-window 3x3 covariance
/// of the guide channels. Edges present in any channel are preserved.
pub fn guided_filter_color(
    guide: &Array3<f32>,
    input: &Array2<f32>,
    radius: usize,
    eps: f32,
) -> Result<Array2<f32>> {
    let (gh, gw, gc) = guide.dim();
    if gc != 3 {
        return Err(DehazeError::InvalidDimensions {
            width: gw,
            height: gh,
        });
    }
    check_filter_args((gh, gw), input.dim(), eps)?;
    let eps = eps as f64;
    let (h, w) = input.dim();

    let ch: Vec<Array2<f64>> = (0..3)
        .map(|c| guide.index_axis(Axis(2), c).mapv(f64::from))
        .collect();
    let mean_i: Vec<Array2<f64>> = ch.iter().map(|c| box_mean(c, radius)).collect();

    // Per-pixel a = (Sigma + eps * U)^-1 * cov(guide, input), shape (h, w, 3).
    let mut a = Array3::<f64>::zeros((h, w, 3));
    let mean_p = {
        let p = input.mapv(f64::from);
        let mean_p = box_mean(&p, radius);

        // Upper triangle of Sigma: rr, rg, rb, gg, gb, bb.
        let mut sigma = Array3::<f64>::zeros((h, w, 6));
        for (k, (x, y)) in SIGMA_PAIRS.into_iter().enumerate() {
            let var = box_mean(&(&ch[x] * &ch[y]), radius) - &mean_i[x] * &mean_i[y];
            sigma.index_axis_mut(Axis(2), k).assign(&var);
        }
        let mut cov = Array3::<f64>::zeros((h, w, 3));
        for c in 0..3 {
            let cov_c = box_mean(&(&ch[c] * &p), radius) - &mean_i[c] * &mean_p;
            cov.index_axis_mut(Axis(2), c).assign(&cov_c);
        }

        let solve = |mut a: ArrayViewMut1<f64>, s: ArrayView1<f64>, c: ArrayView1<f64>| {
            if let Some(solution) = solve_regularized(&s, &c, eps) {
                a.assign(&ArrayView1::from(&solution[..]));
            }
        };
        let zip = Zip::from(a.lanes_mut(Axis(2)))
            .and(sigma.lanes(Axis(2)))
            .and(cov.lanes(Axis(2)));
        if h * w >= PARALLEL_PIXEL_THRESHOLD {
            zip.par_for_each(solve);
        } else {
            zip.for_each(solve);
        }
        mean_p
    };

    let mut b = mean_p;
    for (c, mean) in mean_i.iter().enumerate() {
        b = b - &a.index_axis(Axis(2), c) * mean;
    }
    drop(mean_i);

    let mut out = box_mean(&b, radius);
    drop(b);
    for (c, guide_c) in ch.iter().enumerate() {
        let mean_a = box_mean(&a.index_axis(Axis(2), c).to_owned(), radius);
        out = out + mean_a * guide_c;
    }
    Ok(out.mapv(|v| v as f32))
}

const SIGMA_PAIRS: [(usize, usize); 6] = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)];

/// Solve `(Sigma + eps * U) a = cov` through the adjugate of the symmetric matrix, with
/// `sigma` in `SIGMA_PAIRS` order. `None` when the system is numerically singular.
fn solve_regularized(
    sigma: &ArrayView1<f64>,
    cov: &ArrayView1<f64>,
    eps: f64,
) -> Option<[f64; 3]> {
    let rr = sigma[0] + eps;
    let rg = sigma[1];
    let rb = sigma[2];
    let gg = sigma[3] + eps;
    let gb = sigma[4];
    let bb = sigma[5] + eps;

    let inv_rr = gg * bb - gb * gb;
    let inv_rg = gb * rb - rg * bb;
    let inv_rb = rg * gb - gg * rb;
    let inv_gg = rr * bb - rb * rb;
    let inv_gb = rb * rg - rr * gb;
    let inv_bb = rr * gg - rg * rg;
    let det = rr * inv_rr + rg * inv_rg + rb * inv_rb;
    if det.abs() <= f64::from(EPSILON) * eps * eps {
        return None;
    }

    let (cr, cg, cb) = (cov[0], cov[1], cov[2]);
    Some([
        (cr * inv_rr + cg * inv_rg + cb * inv_rb) / det,
        (cr * inv_rg + cg * inv_gg + cb * inv_gb) / det,
        (cr * inv_rb + cg * inv_gb + cb * inv_bb) / det,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_mode_display() {
        assert_eq!(GuideMode::Color.to_string(), "Color");
        assert_eq!(GuideMode::Luminance.to_string(), "Luminance");
    }

    #[test]
    fn luminance_of_white_is_one() {
        let data = Array3::from_elem((2, 2, 3), 1.0f32);
        for v in luminance(&data).iter() {
            assert!((v - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn rejects_non_positive_eps() {
        let g = Array2::zeros((3, 3));
        let p = Array2::zeros((3, 3));
        assert!(guided_filter_gray(&g, &p, 1, 0.0).is_err());
    }

    #[test]
    fn solve_regularized_diagonal_covariance() {
        let sigma = ndarray::arr1(&[1.0, 0.0, 0.0, 2.0, 0.0, 3.0]);
        let cov = ndarray::arr1(&[1.0, 1.0, 1.0]);
        let a = solve_regularized(&sigma.view(), &cov.view(), 1.0).unwrap();
        assert!((a[0] - 0.5).abs() < 1e-12);
        assert!((a[1] - 1.0 / 3.0).abs() < 1e-12);
        assert!((a[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn solve_regularized_rejects_singular_system() {
        let sigma = ndarray::arr1(&[0.0; 6]);
        let cov = ndarray::arr1(&[1.0, 1.0, 1.0]);
        assert!(solve_regularized(&sigma.view(), &cov.view(), 1e-12).is_none());
    }
}
