use image::{DynamicImage, GrayImage, RgbImage};

use crate::dcp::Airlight;
use crate::frame::Frame;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    DarkChannel,
    Airlight,
    Transmission,
    Refinement,
    Radiance,
    Packaging,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading image"),
            Self::DarkChannel => write!(f, "Dark channel"),
            Self::Airlight => write!(f, "Estimating airlight"),
            Self::Transmission => write!(f, "Transmission"),
            Self::Refinement => write!(f, "Guided filter"),
            Self::Radiance => write!(f, "Recovering radiance"),
            Self::Packaging => write!(f, "Packaging"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started.
    fn begin_stage(&self, _stage: PipelineStage) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when the unreported entry points delegate.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Intermediate results of the estimation stages.
#[derive(Clone, Debug)]
pub struct DehazeEstimate {
    /// Dark channel of the input, on the intensity scale.
    pub dark_channel: Frame,
    /// Airlight after capping at `amax` and, if a component was not positive,
    /// flooring at `AIRLIGHT_FLOOR`.
    pub airlight: Airlight,
    /// Raw transmission floored at `tmin`.
    pub raw_transmission: Frame,
    /// Guided-filter output clamped to `[tmin, 1]`; equal to the raw map when
    /// refinement is disabled.
    pub refined_transmission: Frame,
}

/// One of the five packaged rasters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    DarkChannel,
    RawTransmission,
    RefinedTransmission,
    RawRadiance,
    RefinedRadiance,
}

impl ArtifactKind {
    /// All kinds, in output order.
    pub const ALL: [ArtifactKind; 5] = [
        Self::DarkChannel,
        Self::RawTransmission,
        Self::RefinedTransmission,
        Self::RawRadiance,
        Self::RefinedRadiance,
    ];

    /// Suffix appended to the input file stem when writing.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::DarkChannel => "dark",
            Self::RawTransmission => "transmission_raw",
            Self::RefinedTransmission => "transmission_refined",
            Self::RawRadiance => "radiance_raw",
            Self::RefinedRadiance => "radiance_refined",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DarkChannel => write!(f, "Dark channel"),
            Self::RawTransmission => write!(f, "Raw transmission"),
            Self::RefinedTransmission => write!(f, "Refined transmission"),
            Self::RawRadiance => write!(f, "Radiance (raw t)"),
            Self::RefinedRadiance => write!(f, "Radiance (refined t)"),
        }
    }
}

/// Display-ready result of a dehaze run, all 8-bit.
#[derive(Clone, Debug)]
pub struct DehazeOutput {
    pub dark_channel: GrayImage,
    pub raw_transmission: GrayImage,
    pub refined_transmission: GrayImage,
    pub raw_radiance: RgbImage,
    pub refined_radiance: RgbImage,
    /// Airlight used for recovery.
    pub airlight: Airlight,
}

impl DehazeOutput {
    /// The five rasters in output order.
    pub fn artifacts(&self) -> [(ArtifactKind, DynamicImage); 5] {
        [
            (
                ArtifactKind::DarkChannel,
                DynamicImage::ImageLuma8(self.dark_channel.clone()),
            ),
            (
                ArtifactKind::RawTransmission,
                DynamicImage::ImageLuma8(self.raw_transmission.clone()),
            ),
            (
                ArtifactKind::RefinedTransmission,
                DynamicImage::ImageLuma8(self.refined_transmission.clone()),
            ),
            (
                ArtifactKind::RawRadiance,
                DynamicImage::ImageRgb8(self.raw_radiance.clone()),
            ),
            (
                ArtifactKind::RefinedRadiance,
                DynamicImage::ImageRgb8(self.refined_radiance.clone()),
            ),
        ]
    }
}
