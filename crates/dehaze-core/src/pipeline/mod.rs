pub mod config;
mod artifacts;
mod orchestrator;
mod types;

pub use artifacts::{artifact_path, package, write_artifacts};
pub use orchestrator::{
    dehaze, dehaze_reported, estimate, estimate_reported, run_pipeline, run_pipeline_reported,
};
pub use types::{ArtifactKind, DehazeEstimate, DehazeOutput, PipelineStage, ProgressReporter};
