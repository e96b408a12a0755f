//! Binary entrypoint for image-view.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_image_view::{loader, viewer};

#[derive(Debug, Parser)]
#[command(name = "image-view", version, about = "GPU image viewer")]
struct Args {
    /// Path to the image file to display
    #[arg(value_name = "IMAGE")]
    image: PathBuf,
}

fn main() -> Result<()> {
    // init tracing (RUST_LOG controls level, default = info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let Args { image } = Args::parse();

    // Decode before any windowing so a bad path never opens a window.
    let decoded = loader::load_image(&image)
        .with_context(|| format!("failed to load image from {}", image.display()))?;
    info!(
        width = decoded.width,
        height = decoded.height,
        channels = decoded.channels,
        "displaying {}",
        image.display()
    );

    viewer::run_windowed(decoded).context("viewer failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_argument_renders_usage() {
        let err = Args::try_parse_from(["image-view"]).unwrap_err();
        assert!(err.to_string().contains("Usage: image-view"));
    }

    #[test]
    fn extra_arguments_render_usage() {
        let err = Args::try_parse_from(["image-view", "a.png", "b.png"]).unwrap_err();
        assert!(err.to_string().contains("Usage: image-view"));
    }
}
