//! Color math used by the evaluator.
//!
//! The evaluator is generic over [`ColorMath`], so a caller can plug in its
//! own color library. [`SrgbMath`] is the built-in implementation: it parses
//! leaf literals with `csscolorparser`, does HSL/HWB conversions in `f64`,
//! mixes in sRGB and serialises to `rgb()`/`rgba()` text.

use crate::ast::Channel;

/// Operations the color expression evaluator needs from a color library.
pub trait ColorMath {
    /// The library's color value.
    type Color: Clone;

    /// Parses a leaf color: hex, functional notation or a CSS color name.
    fn parse(&self, literal: &str) -> Option<Self::Color>;

    /// Reads a channel in the units described by [`Channel`].
    fn channel(&self, color: &Self::Color, channel: Channel) -> f64;

    /// Returns a copy of `color` with one channel replaced.
    fn with_channel(&self, color: &Self::Color, channel: Channel, value: f64) -> Self::Color;

    /// Mixes `other` into `base`; `weight` is the share of `other` (`0.0..=1.0`).
    ///
    /// When `blend_alpha` is false the result keeps `base`'s opacity.
    fn mix(
        &self,
        base: &Self::Color,
        other: &Self::Color,
        weight: f64,
        blend_alpha: bool,
    ) -> Self::Color;

    /// WCAG relative luminance, `0.0..=1.0`.
    fn luminance(&self, color: &Self::Color) -> f64;

    /// Opaque white.
    fn white(&self) -> Self::Color;

    /// Opaque black.
    fn black(&self) -> Self::Color;

    /// Serialises to CSS text.
    fn to_css(&self, color: &Self::Color) -> String;

    /// WCAG contrast ratio between two colors, `1.0..=21.0`.
    fn contrast_ratio(&self, a: &Self::Color, b: &Self::Color) -> f64 {
        let la = self.luminance(a);
        let lb = self.luminance(b);
        let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
        (hi + 0.05) / (lo + 0.05)
    }
}

/// An sRGB color with 0–255 channels and 0–1 opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Creates an opaque color from 8-bit channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }

    fn unit(&self) -> (f64, f64, f64) {
        (self.r / 255.0, self.g / 255.0, self.b / 255.0)
    }

    fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: (r * 255.0).clamp(0.0, 255.0),
            g: (g * 255.0).clamp(0.0, 255.0),
            b: (b * 255.0).clamp(0.0, 255.0),
            a,
        }
    }

    /// Hue (degrees), saturation and lightness (0–100).
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.unit();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;
        if delta == 0.0 {
            return (0.0, 0.0, l * 100.0);
        }
        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        (hue_of(r, g, b, max, delta), s * 100.0, l * 100.0)
    }

    /// Builds a color from hue (degrees), saturation and lightness (0–100).
    pub fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> Self {
        let s = (s / 100.0).clamp(0.0, 1.0);
        let l = (l / 100.0).clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::from_unit(l, l, l, a);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h.rem_euclid(360.0) / 360.0;
        Self::from_unit(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            a,
        )
    }

    /// Hue (degrees), whiteness and blackness (0–100).
    pub fn to_hwb(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.unit();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let (h, _, _) = self.to_hsl();
        (h, min * 100.0, (1.0 - max) * 100.0)
    }

    /// Builds a color from hue (degrees), whiteness and blackness (0–100).
    pub fn from_hwb(h: f64, w: f64, bl: f64, a: f64) -> Self {
        let w = (w / 100.0).clamp(0.0, 1.0);
        let bl = (bl / 100.0).clamp(0.0, 1.0);
        if w + bl >= 1.0 {
            let gray = w / (w + bl);
            return Self::from_unit(gray, gray, gray, a);
        }
        let pure = Self::from_hsl(h, 100.0, 50.0, a);
        let (r, g, b) = pure.unit();
        let scale = 1.0 - w - bl;
        Self::from_unit(r * scale + w, g * scale + w, b * scale + w, a)
    }
}

fn hue_of(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (h * 60.0).rem_euclid(360.0)
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert an sRGB component (0.0–1.0) to linear light.
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Formats an opacity with at most three decimals and no trailing zeros.
fn format_alpha(a: f64) -> String {
    let text = format!("{:.3}", a);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// `true` for hex digits written without a leading `#` (`bad`, `beef`).
///
/// `csscolorparser` reads these as hex colors, but a bare word in a color
/// expression is a theme reference or a CSS color name. No CSS color name
/// consists only of hex digits.
fn is_bare_hex(literal: &str) -> bool {
    !literal.is_empty() && literal.chars().all(|c| c.is_ascii_hexdigit())
}

/// The built-in sRGB color library.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrgbMath;

impl ColorMath for SrgbMath {
    type Color = Rgba;

    fn parse(&self, literal: &str) -> Option<Rgba> {
        let literal = literal.trim();
        if is_bare_hex(literal) {
            return None;
        }
        let parsed: csscolorparser::Color = literal.parse().ok()?;
        Some(Rgba {
            r: f64::from(parsed.r) * 255.0,
            g: f64::from(parsed.g) * 255.0,
            b: f64::from(parsed.b) * 255.0,
            a: f64::from(parsed.a),
        })
    }

    fn channel(&self, color: &Rgba, channel: Channel) -> f64 {
        match channel {
            Channel::Alpha => color.a,
            Channel::Hue => color.to_hsl().0,
            Channel::Saturation => color.to_hsl().1,
            Channel::Lightness => color.to_hsl().2,
            Channel::Whiteness => color.to_hwb().1,
            Channel::Blackness => color.to_hwb().2,
        }
    }

    fn with_channel(&self, color: &Rgba, channel: Channel, value: f64) -> Rgba {
        match channel {
            Channel::Alpha => Rgba {
                a: value.clamp(0.0, 1.0),
                ..*color
            },
            Channel::Hue | Channel::Saturation | Channel::Lightness => {
                let (mut h, mut s, mut l) = color.to_hsl();
                match channel {
                    Channel::Hue => h = value,
                    Channel::Saturation => s = value,
                    _ => l = value,
                }
                Rgba::from_hsl(h, s, l, color.a)
            }
            Channel::Whiteness | Channel::Blackness => {
                let (h, mut w, mut b) = color.to_hwb();
                if channel == Channel::Whiteness {
                    w = value;
                } else {
                    b = value;
                }
                Rgba::from_hwb(h, w, b, color.a)
            }
        }
    }

    fn mix(&self, base: &Rgba, other: &Rgba, weight: f64, blend_alpha: bool) -> Rgba {
        let w = weight.clamp(0.0, 1.0);
        let lerp = |from: f64, to: f64| from + (to - from) * w;
        Rgba {
            r: lerp(base.r, other.r),
            g: lerp(base.g, other.g),
            b: lerp(base.b, other.b),
            a: if blend_alpha {
                lerp(base.a, other.a)
            } else {
                base.a
            },
        }
    }

    fn luminance(&self, color: &Rgba) -> f64 {
        let (r, g, b) = color.unit();
        0.2126 * srgb_to_linear(r) + 0.7152 * srgb_to_linear(g) + 0.0722 * srgb_to_linear(b)
    }

    fn white(&self) -> Rgba {
        Rgba::rgb(255, 255, 255)
    }

    fn black(&self) -> Rgba {
        Rgba::rgb(0, 0, 0)
    }

    fn to_css(&self, color: &Rgba) -> String {
        let r = color.r.round() as u8;
        let g = color.g.round() as u8;
        let b = color.b.round() as u8;
        if color.a >= 1.0 {
            format!("rgb({}, {}, {})", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {})", r, g, b, format_alpha(color.a))
        }
    }
}
