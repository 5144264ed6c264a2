//! Brightness adjustment in HSV space.
//!
//! Pixels are converted to 8-bit HSV (`h` in `[0, 180)`, `s` and `v` in
//! `[0, 255]`), the value channel is raised by a fixed delta with saturation
//! at 255, and the result is converted back to RGB. Hue and saturation are
//! carried through unchanged, so the shift is approximate for the non-maximal
//! channels but exact for the value channel.

use image::{Rgb, RgbImage};

/// Default brightness increase applied to every photo.
pub const DEFAULT_BRIGHTNESS_DELTA: u8 = 18;

/// An 8-bit HSV pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue in half-degrees, `[0, 180)`.
    pub h: u8,
    /// Saturation, `[0, 255]`.
    pub s: u8,
    /// Value (the maximum RGB channel), `[0, 255]`.
    pub v: u8,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(x: f32) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGB pixel to 8-bit HSV.
#[must_use]
pub fn rgb_to_hsv(px: Rgb<u8>) -> Hsv {
    let [r, g, b] = px.0;
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    if v == min {
        return Hsv { h: 0, s: 0, v };
    }

    let diff = f32::from(v - min);
    let s = to_u8(diff * 255.0 / f32::from(v));

    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let mut deg = if v == r {
        60.0 * (gf - bf) / diff
    } else if v == g {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if deg < 0.0 {
        deg += 360.0;
    }

    let mut h = to_u8(deg / 2.0);
    if h >= 180 {
        h -= 180;
    }
    Hsv { h, s, v }
}

/// Convert an 8-bit HSV pixel back to RGB.
///
/// The largest output channel always equals `hsv.v`.
#[must_use]
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb<u8> {
    let v = f32::from(hsv.v) / 255.0;
    let s = f32::from(hsv.s) / 255.0;
    if hsv.s == 0 {
        return Rgb([hsv.v; 3]);
    }

    let h = f32::from(hsv.h % 180) * 2.0 / 60.0;
    let sector = h.floor();
    let frac = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * frac);
    let t = v * (1.0 - s * (1.0 - frac));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb([to_u8(r * 255.0), to_u8(g * 255.0), to_u8(b * 255.0)])
}

/// Raise a value channel by `delta`, saturating at 255.
#[must_use]
pub fn brighten_value(v: u8, delta: u8) -> u8 {
    if v > 255 - delta {
        255
    } else {
        v + delta
    }
}

/// Return a brightened copy of `image`.
///
/// Every pixel's HSV value channel becomes `v + delta`, or 255 when
/// `v > 255 - delta`. A zero delta returns an unchanged copy.
#[must_use]
pub fn adjust_brightness(image: &RgbImage, delta: u8) -> RgbImage {
    let mut out = image.clone();
    if delta == 0 {
        return out;
    }

    for px in out.pixels_mut() {
        let mut hsv = rgb_to_hsv(*px);
        hsv.v = brighten_value(hsv.v, delta);
        *px = hsv_to_rgb(hsv);
    }
    out
}
