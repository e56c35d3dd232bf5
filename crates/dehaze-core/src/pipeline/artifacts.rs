use std::path::{Path, PathBuf};

use crate::consts::MAX_INTENSITY;
use crate::error::Result;
use crate::frame::RgbFrame;
use crate::io::image_io::{quantize_gray, quantize_rgb, save_png};

use super::types::{ArtifactKind, DehazeEstimate, DehazeOutput};

/// Clamp and quantize every result to 8 bits.
///
/// Transmission maps are scaled by 255 first; the dark channel and radiances are
/// already on the intensity scale.
pub fn package(
    estimate: &DehazeEstimate,
    raw_radiance: &RgbFrame,
    refined_radiance: &RgbFrame,
) -> DehazeOutput {
    DehazeOutput {
        dark_channel: quantize_gray(&estimate.dark_channel.data, 1.0),
        raw_transmission: quantize_gray(&estimate.raw_transmission.data, MAX_INTENSITY),
        refined_transmission: quantize_gray(&estimate.refined_transmission.data, MAX_INTENSITY),
        raw_radiance: quantize_rgb(raw_radiance),
        refined_radiance: quantize_rgb(refined_radiance),
        airlight: estimate.airlight,
    }
}

/// `<dir>/<stem>_<suffix>.png`
pub fn artifact_path(dir: &Path, stem: &str, kind: ArtifactKind) -> PathBuf {
    dir.join(format!("{stem}_{}.png", kind.file_suffix()))
}

/// Write all five artifacts as PNG into `dir`, creating it if needed.
/// Returns the written paths in output order.
pub fn write_artifacts(output: &DehazeOutput, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(ArtifactKind::ALL.len());
    for (kind, img) in output.artifacts() {
        let path = artifact_path(dir, stem, kind);
        save_png(&img, &path)?;
        written.push(path);
    }
    Ok(written)
}
