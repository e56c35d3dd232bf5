use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dehaze_core::dcp::{dark_channel_frame, estimate_airlight};
use dehaze_core::io::image_io::load_rgb_image_with_info;
use dehaze_core::pipeline::config::DehazeConfig;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image
    pub file: PathBuf,

    /// Dark-channel window size in pixels
    #[arg(long, default_value_t = DehazeConfig::default().window)]
    pub window: usize,

    /// Fraction of brightest dark-channel pixels searched for the airlight
    #[arg(long, default_value_t = DehazeConfig::default().percentile)]
    pub percentile: f64,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    DehazeConfig {
        window: args.window,
        percentile: args.percentile,
        ..Default::default()
    }
    .validate()?;

    let (image, info) = load_rgb_image_with_info(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let dark = dark_channel_frame(&image, args.window);
    let (lo, hi) = dark.min_max();
    let airlight = estimate_airlight(&image, &dark, args.percentile)?;

    println!("File:         {}", info.filename.display());
    println!("Dimensions:   {}x{}", info.width, info.height);
    println!("Pixels:       {}", image.pixel_count());
    println!(
        "Dark channel: min {:.1}  mean {:.1}  max {:.1}",
        lo,
        dark.mean(),
        hi
    );
    println!("Airlight:     {}", airlight);

    Ok(())
}
