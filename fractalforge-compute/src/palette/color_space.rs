//! sRGB, OKLAB and OKLCH conversions for perceptually even palettes.
//!
//! Gradients interpolate in OKLAB; hue-cycling palettes walk OKLCH.

use std::f64::consts::TAU;

/// sRGB component [0,1] to linear light.
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear light to sRGB component [0,1].
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

pub fn linear_rgb_to_oklab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
    let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
    let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

    let (l, m, s) = (l.cbrt(), m.cbrt(), s.cbrt());

    (
        0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s,
        1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s,
        0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s,
    )
}

/// OKLAB to linear RGB, clamped to the displayable range.
pub fn oklab_to_linear_rgb(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let l_ = l + 0.3963377774 * a + 0.2158037573 * b;
    let m_ = l - 0.1055613458 * a - 0.0638541728 * b;
    let s_ = l - 0.0894841775 * a - 1.2914855480 * b;

    let (l3, m3, s3) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

    let r = 4.0767416621 * l3 - 3.3077115913 * m3 + 0.2309699292 * s3;
    let g = -1.2684380046 * l3 + 2.6097574011 * m3 - 0.3413193965 * s3;
    let b = -0.0041960863 * l3 - 0.7034186147 * m3 + 1.7076147010 * s3;

    (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
}

/// 8-bit sRGB to OKLAB.
pub fn srgb8_to_oklab(color: [u8; 3]) -> (f64, f64, f64) {
    linear_rgb_to_oklab(
        srgb_to_linear(color[0] as f64 / 255.0),
        srgb_to_linear(color[1] as f64 / 255.0),
        srgb_to_linear(color[2] as f64 / 255.0),
    )
}

/// OKLAB to 8-bit sRGB.
pub fn oklab_to_srgb8(l: f64, a: f64, b: f64) -> [u8; 3] {
    let (r, g, b) = oklab_to_linear_rgb(l, a, b);
    [to_byte(linear_to_srgb(r)), to_byte(linear_to_srgb(g)), to_byte(linear_to_srgb(b))]
}

/// OKLCH to 8-bit sRGB. Hue is in turns, so `hue = 1.0` wraps to `0.0`.
pub fn oklch_to_srgb8(lightness: f64, chroma: f64, hue: f64) -> [u8; 3] {
    let angle = hue.rem_euclid(1.0) * TAU;
    oklab_to_srgb8(lightness, chroma * angle.cos(), chroma * angle.sin())
}

/// Unit-range component to a byte.
pub fn to_byte(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}
