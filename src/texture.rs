//! CPU-to-GPU texture path: texel layout selection, mip chain, upload.

use tracing::debug;

use crate::loader::DecodedImage;

/// Texel layout chosen from the decoded channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Three samples per pixel; expanded to RGBA with opaque alpha at upload
    /// because GPU texel formats have no three-channel layout.
    Rgb,
    /// Four samples per pixel, uploaded as-is.
    Rgba,
}

impl PixelFormat {
    /// Map a decoded channel count to a texel layout.
    ///
    /// 3 selects [`PixelFormat::Rgb`]; every other count, including the 1-
    /// and 2-channel grayscale layouts, falls through to
    /// [`PixelFormat::Rgba`] unvalidated. Buffers whose real stride is
    /// smaller than four bytes per pixel are caught by texture upload
    /// validation rather than here.
    #[must_use]
    pub const fn from_channels(channels: u8) -> Self {
        if channels == 3 { Self::Rgb } else { Self::Rgba }
    }

    /// Bytes per pixel in the source buffer for this layout.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Expand a pixel buffer to RGBA8 texels.
///
/// RGB pixels gain an opaque alpha byte; RGBA buffers pass through untouched.
#[must_use]
pub fn rgba_texels(pixels: Vec<u8>, format: PixelFormat) -> Vec<u8> {
    match format {
        PixelFormat::Rgba => pixels,
        PixelFormat::Rgb => {
            let mut out = Vec::with_capacity(pixels.len() / format.bytes_per_pixel() * 4);
            for rgb in pixels.chunks_exact(format.bytes_per_pixel()) {
                out.extend_from_slice(rgb);
                out.push(u8::MAX);
            }
            out
        }
    }
}

/// Number of levels in a full mip chain for the given dimensions, down to
/// and including 1x1.
#[must_use]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Halve an RGBA8 image with a 2x2 box filter, clamping reads at the edges
/// of odd dimensions.
///
/// `width` and `height` must both be at least 1.
#[must_use]
pub fn downsample_rgba(pixels: &[u8], width: u32, height: u32) -> (Vec<u8>, u32, u32) {
    let dst_w = (width / 2).max(1);
    let dst_h = (height / 2).max(1);
    let mut out = Vec::with_capacity((dst_w * dst_h * 4) as usize);
    for y in 0..dst_h {
        let y0 = (y * 2).min(height - 1);
        let y1 = (y * 2 + 1).min(height - 1);
        for x in 0..dst_w {
            let x0 = (x * 2).min(width - 1);
            let x1 = (x * 2 + 1).min(width - 1);
            for channel in 0..4 {
                let sum = u32::from(sample(pixels, width, x0, y0, channel))
                    + u32::from(sample(pixels, width, x1, y0, channel))
                    + u32::from(sample(pixels, width, x0, y1, channel))
                    + u32::from(sample(pixels, width, x1, y1, channel));
                out.push((sum / 4) as u8);
            }
        }
    }
    (out, dst_w, dst_h)
}

fn sample(pixels: &[u8], width: u32, x: u32, y: u32, channel: usize) -> u8 {
    pixels[(y as usize * width as usize + x as usize) * 4 + channel]
}

/// GPU-resident image texture.
pub struct ImageTexture {
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

/// Upload `image` as a 2D sRGB texture with a full mip chain.
///
/// The decoded buffer is consumed here; each level past 0 is a box-filtered
/// halving of the level above, computed on the CPU and written separately.
pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: DecodedImage) -> ImageTexture {
    let DecodedImage {
        width,
        height,
        channels,
        pixels,
    } = image;
    let format = PixelFormat::from_channels(channels);
    let texels = rgba_texels(pixels, format);

    let mip_levels = mip_level_count(width, height);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("image"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: mip_levels,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        texture.as_image_copy(),
        &texels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    let mut level = texels;
    let (mut level_w, mut level_h) = (width, height);
    for mip in 1..mip_levels {
        let (next, next_w, next_h) = downsample_rgba(&level, level_w, level_h);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: mip,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &next,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * next_w),
                rows_per_image: Some(next_h),
            },
            wgpu::Extent3d {
                width: next_w,
                height: next_h,
                depth_or_array_layers: 1,
            },
        );
        level = next;
        (level_w, level_h) = (next_w, next_h);
    }
    debug!(width, height, mip_levels, "wrote image texture levels");

    ImageTexture {
        view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_channels_select_rgb() {
        assert_eq!(PixelFormat::from_channels(3), PixelFormat::Rgb);
        assert_eq!(PixelFormat::Rgb.bytes_per_pixel(), 3);
    }

    #[test]
    fn other_channel_counts_fall_through_to_rgba() {
        // 4 is the intended RGBA case; 1, 2, and 5 inherit the same branch.
        for channels in [1, 2, 4, 5] {
            assert_eq!(PixelFormat::from_channels(channels), PixelFormat::Rgba);
        }
    }

    #[test]
    fn rgb_expansion_adds_opaque_alpha() {
        let texels = rgba_texels(vec![1, 2, 3, 4, 5, 6], PixelFormat::Rgb);
        assert_eq!(texels, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn rgba_buffers_pass_through_untouched() {
        let pixels = vec![9, 8, 7, 6];
        assert_eq!(rgba_texels(pixels.clone(), PixelFormat::Rgba), pixels);
    }

    #[test]
    fn full_chain_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(5, 3), 3);
        assert_eq!(mip_level_count(800, 600), 10);
        assert_eq!(mip_level_count(1, 1024), 11);
    }

    #[test]
    fn downsample_averages_two_by_two_blocks() {
        let pixels = vec![
            0, 0, 0, 255, 100, 0, 0, 255, //
            0, 200, 0, 255, 0, 0, 40, 255,
        ];
        let (out, w, h) = downsample_rgba(&pixels, 2, 2);
        assert_eq!((w, h), (1, 1));
        assert_eq!(out, vec![25, 50, 10, 255]);
    }

    #[test]
    fn downsample_clamps_odd_edges() {
        // A 1x2 column: the missing right-hand samples clamp to the only
        // column, so the result is a plain vertical average.
        let pixels = vec![10, 0, 0, 255, 30, 0, 0, 255];
        let (out, w, h) = downsample_rgba(&pixels, 1, 2);
        assert_eq!((w, h), (1, 1));
        assert_eq!(out[0], 20);
    }

    #[test]
    fn downsample_handles_the_one_by_one_minimum() {
        // All four box samples clamp to the single pixel.
        let pixels = vec![40, 30, 20, 255];
        let (out, w, h) = downsample_rgba(&pixels, 1, 1);
        assert_eq!((w, h), (1, 1));
        assert_eq!(out, pixels);
    }

    #[test]
    fn downsample_chain_reaches_one_by_one() {
        let (mut pixels, mut w, mut h) = (vec![0u8; 5 * 3 * 4], 5u32, 3u32);
        for _ in 1..mip_level_count(5, 3) {
            let (next, next_w, next_h) = downsample_rgba(&pixels, w, h);
            assert_eq!(next.len(), (next_w * next_h * 4) as usize);
            (pixels, w, h) = (next, next_w, next_h);
        }
        assert_eq!((w, h), (1, 1));
        assert!(!pixels.is_empty());
    }
}
