use std::time::Instant;

use tracing::{debug, info, warn};

use crate::consts::AIRLIGHT_FLOOR;
use crate::dcp::{
    clamp_transmission, dark_channel_frame, estimate_airlight, estimate_transmission,
    floor_transmission, recover_radiance, refine_transmission,
};
use crate::error::Result;
use crate::frame::RgbFrame;
use crate::io::image_io::load_rgb_image;

use super::artifacts::{package, write_artifacts};
use super::config::{DehazeConfig, PipelineConfig};
use super::types::{DehazeEstimate, DehazeOutput, NoOpReporter, PipelineStage, ProgressReporter};

/// Dark channel, airlight and both transmission maps for `image`.
pub fn estimate(image: &RgbFrame, config: &DehazeConfig) -> Result<DehazeEstimate> {
    estimate_reported(image, config, &NoOpReporter)
}

/// [`estimate`] with stage reporting.
pub fn estimate_reported(
    image: &RgbFrame,
    config: &DehazeConfig,
    reporter: &dyn ProgressReporter,
) -> Result<DehazeEstimate> {
    config.validate()?;
    if config.has_even_window() {
        warn!(
            window = config.window,
            "Even dark-channel window is not centred on the pixel"
        );
    }

    reporter.begin_stage(PipelineStage::DarkChannel);
    let start = Instant::now();
    let dark_channel = dark_channel_frame(image, config.window);
    let (lo, hi) = dark_channel.min_max();
    debug!(lo, hi, elapsed = ?start.elapsed(), "Dark channel computed");
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Airlight);
    let estimated = estimate_airlight(image, &dark_channel, config.percentile)?;
    let mut airlight = estimated.capped(config.amax);
    if airlight.is_degenerate() {
        warn!(
            %airlight,
            floor = AIRLIGHT_FLOOR,
            "Airlight has a non-positive component, flooring it"
        );
        airlight = airlight.floored(AIRLIGHT_FLOOR);
    }
    info!(%airlight, estimated = %estimated, "Airlight estimated");
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Transmission);
    let raw = estimate_transmission(image, &airlight, config.window, config.omega)?;
    let raw_transmission = floor_transmission(&raw, config.tmin);
    let (lo, hi) = raw_transmission.min_max();
    debug!(lo, hi, "Raw transmission computed");
    reporter.finish_stage();

    let refined_transmission = if config.guided {
        reporter.begin_stage(PipelineStage::Refinement);
        let start = Instant::now();
        let refined = refine_transmission(
            image,
            &raw_transmission,
            config.radius,
            config.eps,
            config.guide,
        )?;
        debug!(elapsed = ?start.elapsed(), "Guided filter applied");
        reporter.finish_stage();
        clamp_transmission(&refined, config.tmin, 1.0)
    } else {
        raw_transmission.clone()
    };

    Ok(DehazeEstimate {
        dark_channel,
        airlight,
        raw_transmission,
        refined_transmission,
    })
}

/// Run the whole dehaze model on an in-memory image.
pub fn dehaze(image: &RgbFrame, config: &DehazeConfig) -> Result<DehazeOutput> {
    dehaze_reported(image, config, &NoOpReporter)
}

/// [`dehaze`] with stage reporting.
pub fn dehaze_reported(
    image: &RgbFrame,
    config: &DehazeConfig,
    reporter: &dyn ProgressReporter,
) -> Result<DehazeOutput> {
    let estimate = estimate_reported(image, config, reporter)?;

    reporter.begin_stage(PipelineStage::Radiance);
    let raw_radiance = recover_radiance(
        image,
        &estimate.airlight,
        &estimate.raw_transmission,
        config.tmin,
    )?;
    let refined_radiance = if config.guided {
        recover_radiance(
            image,
            &estimate.airlight,
            &estimate.refined_transmission,
            config.tmin,
        )?
    } else {
        raw_radiance.clone()
    };
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Packaging);
    let output = package(&estimate, &raw_radiance, &refined_radiance);
    reporter.finish_stage();

    info!(guided = config.guided, "Dehaze complete");
    Ok(output)
}

/// Decode `config.input`, dehaze it and write the five artifacts to `config.output_dir`.
pub fn run_pipeline(config: &PipelineConfig) -> Result<DehazeOutput> {
    run_pipeline_reported(config, &NoOpReporter)
}

/// [`run_pipeline`] with stage reporting.
///
/// The configuration is checked before the image is opened; a decode failure stops the
/// run before anything is written.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<DehazeOutput> {
    config.dehaze.validate()?;

    reporter.begin_stage(PipelineStage::Loading);
    let image = load_rgb_image(&config.input)?;
    info!(
        width = image.width(),
        height = image.height(),
        input = %config.input.display(),
        "Image loaded"
    );
    reporter.finish_stage();

    let output = dehaze_reported(&image, &config.dehaze, reporter)?;

    reporter.begin_stage(PipelineStage::Writing);
    let stem = config
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dehazed");
    let written = write_artifacts(&output, &config.output_dir, stem)?;
    info!(
        count = written.len(),
        output_dir = %config.output_dir.display(),
        "Artifacts written"
    );
    reporter.finish_stage();

    Ok(output)
}
