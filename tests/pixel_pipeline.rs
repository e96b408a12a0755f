use image::{Rgb, RgbImage, Rgba, RgbaImage};
use rust_image_view::loader::load_image;
use rust_image_view::texture::{PixelFormat, mip_level_count, rgba_texels};
use tempfile::tempdir;

#[test]
fn decoded_rgb_expands_to_full_texel_rows() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("grad.png");
    RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 0]))
        .save(&path)
        .unwrap();

    let decoded = load_image(&path).unwrap();
    let format = PixelFormat::from_channels(decoded.channels);
    assert_eq!(format, PixelFormat::Rgb);

    let (width, height) = (decoded.width, decoded.height);
    let texels = rgba_texels(decoded.pixels, format);
    assert_eq!(texels.len(), (width * height * 4) as usize);
    // Every expanded texel is opaque.
    assert!(texels.chunks_exact(4).all(|px| px[3] == u8::MAX));
    assert_eq!(mip_level_count(width, height), 3);
}

#[test]
fn decoded_rgba_reaches_the_texel_stage_unchanged() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("badge.png");
    RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 200]))
        .save(&path)
        .unwrap();

    let decoded = load_image(&path).unwrap();
    let format = PixelFormat::from_channels(decoded.channels);
    assert_eq!(format, PixelFormat::Rgba);

    let expected = decoded.pixels.clone();
    assert_eq!(rgba_texels(decoded.pixels, format), expected);
}
