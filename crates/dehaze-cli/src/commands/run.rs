use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use dehaze_core::filters::guided::GuideMode;
use dehaze_core::pipeline::config::PipelineConfig;
use dehaze_core::pipeline::{run_pipeline_reported, PipelineStage, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GuideArg {
    /// Full RGB guide
    Color,
    /// Single-channel luminance guide
    Luminance,
}

impl From<GuideArg> for GuideMode {
    fn from(arg: GuideArg) -> Self {
        match arg {
            GuideArg::Color => GuideMode::Color,
            GuideArg::Luminance => GuideMode::Luminance,
        }
    }
}

/// Tuning flags override the config file (or the defaults) only when given.
#[derive(Args, Default)]
pub struct RunArgs {
    /// Input image (any format the image crate decodes)
    pub file: PathBuf,

    /// Pipeline config file (TOML); the input file argument replaces its `input`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lower bound for transmission (0-1] [default: 0.2]
    #[arg(long)]
    pub tmin: Option<f32>,

    /// Upper bound for each airlight component (0-255] [default: 220]
    #[arg(long)]
    pub amax: Option<f32>,

    /// Dark-channel window size in pixels [default: 15]
    #[arg(long)]
    pub window: Option<usize>,

    /// Fraction of brightest dark-channel pixels searched for the airlight [default: 0.001]
    #[arg(long)]
    pub percentile: Option<f64>,

    /// Haze-removal strength (0-1] [default: 0.95]
    #[arg(long)]
    pub omega: Option<f32>,

    /// Skip guided-filter refinement
    #[arg(long)]
    pub no_guided: bool,

    /// Guided-filter radius [default: 40]
    #[arg(long)]
    pub radius: Option<usize>,

    /// Guided-filter regularization [default: 0.001]
    #[arg(long)]
    pub eps: Option<f32>,

    /// Guide image for the refinement [default: color]
    #[arg(long, value_enum)]
    pub guide: Option<GuideArg>,

    /// Output directory [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Drives an indicatif bar, one tick per finished stage.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.to_string());
    }

    fn finish_stage(&self) {
        self.bar.inc(1);
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let base = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let config: PipelineConfig =
            toml::from_str(&contents).context("Invalid pipeline config")?;
        debug!(path = %config_path.display(), "Loaded pipeline config");
        config
    } else {
        PipelineConfig {
            input: args.file.clone(),
            output_dir: PathBuf::from("."),
            dehaze: Default::default(),
        }
    };
    let config = apply_overrides(base, args);

    crate::summary::print_run_summary(&config);

    // Loading, dark channel, airlight, transmission, radiance, packaging, writing.
    let stages = if config.dehaze.guided { 8 } else { 7 };
    let bar = ProgressBar::new(stages);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { bar };

    let output = run_pipeline_reported(&config, &reporter)
        .with_context(|| format!("Failed to dehaze {}", config.input.display()))?;
    reporter.bar.finish_with_message("Done");

    crate::summary::print_run_result(&config, &output);

    Ok(())
}

/// Layer the flags given on the command line over `config`. The input file always
/// comes from the command line.
fn apply_overrides(mut config: PipelineConfig, args: &RunArgs) -> PipelineConfig {
    config.input = args.file.clone();
    if let Some(ref output) = args.output {
        config.output_dir = output.clone();
    }

    let d = &mut config.dehaze;
    if let Some(tmin) = args.tmin {
        d.tmin = tmin;
    }
    if let Some(amax) = args.amax {
        d.amax = amax;
    }
    if let Some(window) = args.window {
        d.window = window;
    }
    if let Some(percentile) = args.percentile {
        d.percentile = percentile;
    }
    if let Some(omega) = args.omega {
        d.omega = omega;
    }
    if args.no_guided {
        d.guided = false;
    }
    if let Some(radius) = args.radius {
        d.radius = radius;
    }
    if let Some(eps) = args.eps {
        d.eps = eps;
    }
    if let Some(guide) = args.guide {
        d.guide = guide.into();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use dehaze_core::pipeline::config::DehazeConfig;

    fn from_file() -> PipelineConfig {
        PipelineConfig {
            input: PathBuf::from("from_file.png"),
            output_dir: PathBuf::from("file_out"),
            dehaze: DehazeConfig {
                window: 9,
                omega: 0.8,
                ..Default::default()
            },
        }
    }

    #[test]
    fn flags_override_config_file() {
        let args = RunArgs {
            file: PathBuf::from("hazy.png"),
            output: Some(PathBuf::from("cli_out")),
            window: Some(21),
            no_guided: true,
            guide: Some(GuideArg::Luminance),
            ..Default::default()
        };
        let config = apply_overrides(from_file(), &args);
        assert_eq!(config.input, PathBuf::from("hazy.png"));
        assert_eq!(config.output_dir, PathBuf::from("cli_out"));
        assert_eq!(config.dehaze.window, 21);
        assert!(!config.dehaze.guided);
        assert_eq!(config.dehaze.guide, GuideMode::Luminance);
        // Not given on the command line: kept from the file.
        assert_eq!(config.dehaze.omega, 0.8);
    }

    #[test]
    fn absent_flags_keep_config_file_values() {
        let args = RunArgs {
            file: PathBuf::from("hazy.png"),
            ..Default::default()
        };
        let config = apply_overrides(from_file(), &args);
        assert_eq!(config.output_dir, PathBuf::from("file_out"));
        assert_eq!(config.dehaze, from_file().dehaze);
    }
}
