//! Exact-size resampling for photos and the watermark.
//!
//! Every filter runs through `fast_image_resize`. Downscaling defaults to
//! area averaging (a box convolution whose support spans the source footprint
//! of each output pixel), with alpha averaged like any other channel.

use fast_image_resize as fr;
use image::{ImageBuffer, Pixel};
use log::debug;

use crate::error::{Error, Result};

/// Resampling filter used to fit images onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ResampleFilter {
    /// Area averaging. Falls back to bilinear when an axis is enlarged.
    #[default]
    Area,
    /// Nearest neighbor.
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic (Catmull-Rom).
    CatmullRom,
    /// Lanczos with window 3.
    Lanczos3,
}

impl ResampleFilter {
    fn resize_alg(self, downscale: bool) -> fr::ResizeAlg {
        match self {
            Self::Area if downscale => fr::ResizeAlg::Convolution(fr::FilterType::Box),
            Self::Area | Self::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            Self::Nearest => fr::ResizeAlg::Nearest,
            Self::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            Self::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }
}

fn pixel_type(channels: u8) -> Result<fr::PixelType> {
    match channels {
        1 => Ok(fr::PixelType::U8),
        2 => Ok(fr::PixelType::U8x2),
        3 => Ok(fr::PixelType::U8x3),
        4 => Ok(fr::PixelType::U8x4),
        n => Err(Error::Resize(format!("unsupported channel count {n}"))),
    }
}

/// Resize `image` to exactly `width` x `height`.
///
/// Returns a copy when the image already has the requested size.
///
/// # Errors
///
/// Returns [`Error::Resize`] if the resampler rejects the buffers.
pub fn resize<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let (src_w, src_h) = image.dimensions();
    if (src_w, src_h) == (width, height) {
        return Ok(image.clone());
    }

    let downscale = width <= src_w && height <= src_h;
    let alg = filter.resize_alg(downscale);
    debug!("resizing {src_w}x{src_h} -> {width}x{height} with {filter:?} ({alg:?})");

    let pixel_type = pixel_type(P::CHANNEL_COUNT)?;
    let src = fr::images::Image::from_vec_u8(src_w, src_h, image.as_raw().clone(), pixel_type)
        .map_err(|e| Error::Resize(format!("source buffer: {e}")))?;
    let mut dst = fr::images::Image::new(width, height, pixel_type);

    let options = fr::ResizeOptions::new().resize_alg(alg).use_alpha(false);
    fr::Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|e| Error::Resize(e.to_string()))?;

    ImageBuffer::from_raw(width, height, dst.into_vec())
        .ok_or_else(|| Error::Resize("output buffer has unexpected length".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn same_size_is_a_copy() {
        let img = RgbImage::from_fn(7, 5, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = (x * 10 + y) as u8;
            Rgb([v, v, v])
        });
        for filter in [ResampleFilter::Area, ResampleFilter::Lanczos3] {
            assert_eq!(resize(&img, 7, 5, filter).unwrap(), img);
        }
    }

    #[test]
    fn area_halving_averages_blocks() {
        let img = RgbImage::from_fn(4, 2, |x, _| {
            if x % 2 == 0 {
                Rgb([0, 100, 200])
            } else {
                Rgb([100, 200, 250])
            }
        });
        let out = resize(&img, 2, 1, ResampleFilter::Area).unwrap();
        assert_eq!(out.dimensions(), (2, 1));
        for px in out.pixels() {
            assert_eq!(*px, Rgb([50, 150, 225]));
        }
    }

    #[test]
    fn area_averages_alpha_independently() {
        let img = RgbaImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 0])
            }
        });
        let out = resize(&img, 1, 1, ResampleFilter::Area).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([128, 0, 128, 128]));
    }

    #[test]
    fn area_fractional_scale_preserves_flat_color() {
        let img = RgbaImage::from_pixel(1000, 900, Rgba([12, 34, 56, 78]));
        let out = resize(&img, 756, 756, ResampleFilter::Area).unwrap();
        assert_eq!(out.dimensions(), (756, 756));
        assert!(out.pixels().all(|px| *px == Rgba([12, 34, 56, 78])));
    }

    #[test]
    fn every_filter_produces_requested_size() {
        let img = RgbImage::from_pixel(30, 20, Rgb([1, 2, 3]));
        for filter in [
            ResampleFilter::Area,
            ResampleFilter::Nearest,
            ResampleFilter::Triangle,
            ResampleFilter::CatmullRom,
            ResampleFilter::Lanczos3,
        ] {
            assert_eq!(resize(&img, 12, 45, filter).unwrap().dimensions(), (12, 45));
            assert_eq!(resize(&img, 8, 8, filter).unwrap().dimensions(), (8, 8));
        }
    }
}
