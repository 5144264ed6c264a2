//! Alpha-masked overlay blending.
//!
//! The watermark is applied with an inverse-mask law:
//! `result = (base + overlay_color) * (255 - alpha) / 255`
//!
//! Both the base and the overlay color are weighted by the *background*
//! weight `255 - alpha`, not by `alpha`. This is not a conventional "over"
//! composite: a fully opaque overlay pixel yields black, and a fully
//! transparent one adds its color on top of the base. Semi-transparent
//! watermarks come out as a faint tint, which is the intended look.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Blend a single base pixel with an overlay pixel.
///
/// Channels are normalized to `[0, 1]`, scaled by the background weight,
/// summed, rescaled to 8 bits and rounded.
#[must_use]
pub fn blend_pixel(base: Rgb<u8>, overlay: Rgba<u8>) -> Rgb<u8> {
    let background_weight = f32::from(255 - overlay[3]) / 255.0;

    let mut out = [0u8; 3];
    for (ch, dst) in out.iter_mut().enumerate() {
        let base_part = f32::from(base[ch]) / 255.0 * background_weight;
        let watermark_part = f32::from(overlay[ch]) / 255.0 * background_weight;
        let value = (base_part * 255.0 + watermark_part * 255.0).clamp(0.0, 255.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            *dst = value.round() as u8;
        }
    }
    Rgb(out)
}

/// Composite `overlay` onto `base`, returning a new 3-channel image.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the two images differ in width or
/// height.
pub fn composite(base: &RgbImage, overlay: &RgbaImage) -> Result<RgbImage> {
    if base.dimensions() != overlay.dimensions() {
        return Err(Error::DimensionMismatch {
            base_width: base.width(),
            base_height: base.height(),
            overlay_width: overlay.width(),
            overlay_height: overlay.height(),
        });
    }

    let mut out = RgbImage::new(base.width(), base.height());
    for ((dst, src), wm) in out.pixels_mut().zip(base.pixels()).zip(overlay.pixels()) {
        *dst = blend_pixel(*src, *wm);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let (r, g) = ((x * 31 % 256) as u8, (y * 17 % 256) as u8);
            Rgb([r, g, r ^ g])
        })
    }

    #[test]
    fn half_opaque_blue_over_white_matches_worked_example() {
        let base = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 128]));

        let out = composite(&base, &overlay).unwrap();

        assert_eq!(out.dimensions(), (4, 4));
        for px in out.pixels() {
            assert_eq!(*px, Rgb([127, 127, 254]));
        }
    }

    #[test]
    fn transparent_black_overlay_passes_base_through() {
        let base = gradient(16, 9);
        let overlay = RgbaImage::from_pixel(16, 9, Rgba([0, 0, 0, 0]));

        let out = composite(&base, &overlay).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn transparent_colored_overlay_adds_color_and_saturates() {
        let base = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([10, 20, 30])
            } else {
                Rgb([250, 240, 100])
            }
        });
        let overlay = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 0]));

        let out = composite(&base, &overlay).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgb([20, 40, 60]));
        assert_eq!(*out.get_pixel(1, 0), Rgb([255, 255, 130]));
    }

    #[test]
    fn fully_opaque_overlay_yields_black() {
        let base = gradient(8, 8);
        let overlay = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 255]));

        let out = composite(&base, &overlay).unwrap();
        assert!(out.pixels().all(|px| *px == Rgb([0, 0, 0])));
    }

    #[test]
    fn per_pixel_alpha_is_respected() {
        let base = RgbImage::from_pixel(2, 1, Rgb([100, 100, 100]));
        let overlay = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });

        let out = composite(&base, &overlay).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgb([100, 100, 100]));
        assert_eq!(*out.get_pixel(1, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let base = RgbImage::new(4, 4);
        let overlay = RgbaImage::new(4, 5);

        let err = composite(&base, &overlay).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                base_width: 4,
                base_height: 4,
                overlay_width: 4,
                overlay_height: 5,
            }
        ));
    }

    #[test]
    fn inputs_are_left_untouched() {
        let base = gradient(5, 5);
        let overlay = RgbaImage::from_pixel(5, 5, Rgba([9, 9, 9, 60]));
        let (base_copy, overlay_copy) = (base.clone(), overlay.clone());

        let _ = composite(&base, &overlay).unwrap();
        assert_eq!(base, base_copy);
        assert_eq!(overlay, overlay_copy);
    }
}
