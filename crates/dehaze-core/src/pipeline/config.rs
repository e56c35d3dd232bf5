use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_AMAX, DEFAULT_GUIDED_EPS, DEFAULT_GUIDED_RADIUS, DEFAULT_OMEGA, DEFAULT_PERCENTILE,
    DEFAULT_TMIN, DEFAULT_WINDOW, MAX_INTENSITY,
};
use crate::error::{DehazeError, Result};
use crate::filters::guided::GuideMode;

/// Parameters of a single dehaze run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DehazeConfig {
    /// Lower bound for transmission, in (0, 1].
    #[serde(default = "default_tmin")]
    pub tmin: f32,
    /// Upper bound for each airlight component, in (0, 255].
    #[serde(default = "default_amax")]
    pub amax: f32,
    /// Dark-channel window size in pixels. Odd sizes centre the window; even sizes
    /// reach one pixel further up and left.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Fraction of pixels, brightest dark channel first, searched for the airlight.
    #[serde(default = "default_percentile")]
    pub percentile: f64,
    /// Haze-removal strength in (0, 1].
    #[serde(default = "default_omega")]
    pub omega: f32,
    /// Refine the transmission with a guided filter.
    #[serde(default = "default_guided")]
    pub guided: bool,
    /// Guided-filter radius.
    #[serde(default = "default_radius")]
    pub radius: usize,
    /// Guided-filter regularization.
    #[serde(default = "default_eps")]
    pub eps: f32,
    #[serde(default)]
    pub guide: GuideMode,
}

fn default_tmin() -> f32 {
    DEFAULT_TMIN
}
fn default_amax() -> f32 {
    DEFAULT_AMAX
}
fn default_window() -> usize {
    DEFAULT_WINDOW
}
fn default_percentile() -> f64 {
    DEFAULT_PERCENTILE
}
fn default_omega() -> f32 {
    DEFAULT_OMEGA
}
fn default_guided() -> bool {
    true
}
fn default_radius() -> usize {
    DEFAULT_GUIDED_RADIUS
}
fn default_eps() -> f32 {
    DEFAULT_GUIDED_EPS
}

impl Default for DehazeConfig {
    fn default() -> Self {
        Self {
            tmin: DEFAULT_TMIN,
            amax: DEFAULT_AMAX,
            window: DEFAULT_WINDOW,
            percentile: DEFAULT_PERCENTILE,
            omega: DEFAULT_OMEGA,
            guided: true,
            radius: DEFAULT_GUIDED_RADIUS,
            eps: DEFAULT_GUIDED_EPS,
            guide: GuideMode::default(),
        }
    }
}

fn invalid(msg: String) -> Result<()> {
    Err(DehazeError::InvalidConfig(msg))
}

impl DehazeConfig {
    /// Reject parameter values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return invalid("window must be at least 1".into());
        }
        if !(self.percentile > 0.0 && self.percentile <= 1.0) {
            return invalid(format!("percentile must be in (0, 1], got {}", self.percentile));
        }
        if !(self.tmin > 0.0 && self.tmin <= 1.0) {
            return invalid(format!("tmin must be in (0, 1], got {}", self.tmin));
        }
        if !(self.amax > 0.0 && self.amax <= MAX_INTENSITY) {
            return invalid(format!(
                "amax must be in (0, {MAX_INTENSITY}], got {}",
                self.amax
            ));
        }
        if !(self.omega > 0.0 && self.omega <= 1.0) {
            return invalid(format!("omega must be in (0, 1], got {}", self.omega));
        }
        if self.guided && !(self.eps > 0.0 && self.eps.is_finite()) {
            return invalid(format!("eps must be positive, got {}", self.eps));
        }
        Ok(())
    }

    /// Even windows are accepted but sit off-centre.
    pub fn has_even_window(&self) -> bool {
        self.window % 2 == 0
    }
}

/// A file-to-files run: decode `input`, write the five artifacts into `output_dir`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub dehaze: DehazeConfig,
}
