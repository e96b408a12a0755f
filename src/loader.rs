//! Image decoding for the viewer.
//!
//! Decoding happens before any window exists so that a bad path or a corrupt
//! file fails fast without flashing a window on screen.

use std::path::Path;

use image::{ColorType, DynamicImage, ImageReader};
use tracing::debug;

use crate::error::Error;

/// A decoded image ready for GPU upload.
///
/// Rows are stored bottom-up: the loader flips the picture vertically so that
/// row 0 holds the bottom of the image, matching the clip-space-derived UV
/// mapping in the shader.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel as reported by the decoder (3 = RGB, 4 = RGBA).
    pub channels: u8,
    /// Raw 8-bit samples, row-major, `width * height * channels` bytes.
    pub pixels: Vec<u8>,
}

/// Decode the image file at `path`.
///
/// The format is sniffed from the file contents, falling back to the
/// extension. Samples are normalized to 8 bits but the decoder's channel
/// count is preserved; the texture stage picks its texel layout from it.
///
/// # Errors
/// Returns [`Error::Io`] when the file cannot be read and [`Error::Decode`]
/// when its contents cannot be decoded.
pub fn load_image(path: &Path) -> Result<DecodedImage, Error> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let img = normalize_to_8bit(img);

    let width = img.width();
    let height = img.height();
    let channels = img.color().channel_count();
    debug!(width, height, channels, "decoded {}", path.display());

    // Row 0 becomes the bottom of the picture.
    let flipped = img.flipv();

    Ok(DecodedImage {
        width,
        height,
        channels,
        pixels: flipped.into_bytes(),
    })
}

/// Narrow wide sample types to 8 bits.
///
/// 8-bit buffers pass through with their channel count intact. Wide RGB
/// narrows to `Rgb8`; any other wide layout converts to `Rgba8`, so 16-bit
/// grayscale gains channels here while 8-bit grayscale keeps its one or two.
fn normalize_to_8bit(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => img,
        ColorType::Rgb16 | ColorType::Rgb32F => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => DynamicImage::ImageRgba8(img.to_rgba8()),
    }
}
