//! Preprocess command - prepare a scanned image for an OCR engine.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use fieldex_core::ImagePreprocessor;

/// Arguments for the preprocess command.
#[derive(Args)]
pub struct PreprocessArgs {
    /// Input image (PNG, JPEG, TIFF, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output image; the format follows the extension
    #[arg(short, long, required = true)]
    output: PathBuf,

    /// Binarize with an adaptive threshold
    #[arg(long)]
    threshold: bool,

    /// Upscale until the shorter side reaches this many pixels
    #[arg(long)]
    min_dimension: Option<u32>,
}

pub fn run(args: PreprocessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut preprocess = config.preprocess.clone();
    if args.threshold {
        preprocess.threshold = true;
    }
    if let Some(min_dimension) = args.min_dimension {
        preprocess.min_dimension = min_dimension;
    }

    let (width, height) = image::image_dimensions(&args.input)?;
    info!("Loaded {} ({}x{})", args.input.display(), width, height);

    ImagePreprocessor::with_config(preprocess).process_file(&args.input, &args.output)?;
    let (new_width, new_height) = image::image_dimensions(&args.output)?;

    println!(
        "{} Wrote {} ({}x{} -> {}x{}) in {:?}",
        style("✓").green(),
        args.output.display(),
        width,
        height,
        new_width,
        new_height,
        start.elapsed()
    );

    Ok(())
}
