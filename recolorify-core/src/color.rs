/// Canonical 8-bit RGBA color and the conversions into it.
///
/// Everything downstream of this module (distance, search, blend) works on
/// straight, non-premultiplied 8-bit channels. Hex text, `image` pixels and
/// premultiplied canvas buffers all pass through here first.
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::{RecolorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent black. Also the result of a degenerate blend.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string like "#FF6B35" or " ff6b35 " into an opaque color.
    pub fn parse_hex(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(invalid(text, "empty color"));
        }
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(invalid(text, "expected 6 hex digits"));
        }
        // from_str_radix tolerates a leading '+', so check digits up front
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid(text, "non-hex character"));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| invalid(text, "non-hex character"))?;
        Ok(Self::rgb(
            (value >> 16) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        ))
    }

    /// Uppercase `#RRGGBB`; alpha is not encoded.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Recover straight color from alpha-premultiplied channels.
    ///
    /// Alpha 0 carries no color information and maps to transparent black.
    pub fn from_premultiplied(r: u8, g: u8, b: u8, a: u8) -> Self {
        if a == 0 {
            return Self::TRANSPARENT;
        }
        if a == 255 {
            return Self::rgba(r, g, b, a);
        }
        let unmul = |c: u8| -> u8 {
            let a = a as u32;
            ((c as u32 * 255 + a / 2) / a).min(255) as u8
        };
        Self::rgba(unmul(r), unmul(g), unmul(b), a)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

fn invalid(input: &str, reason: &'static str) -> RecolorError {
    RecolorError::InvalidColor {
        input: input.to_string(),
        reason,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = RecolorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Self { r, g, b, a }
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Bring any decoded image into straight 8-bit RGBA.
///
/// RGBA8 input is borrowed untouched; every other layout (gray, RGB, 16-bit,
/// float) goes through `image`'s own channel conversion.
pub fn normalize_image(img: &DynamicImage) -> Cow<'_, RgbaImage> {
    match img {
        DynamicImage::ImageRgba8(rgba) => Cow::Borrowed(rgba),
        other => Cow::Owned(other.to_rgba8()),
    }
}

/// Un-premultiply an RGBA8 byte buffer in place.
pub fn normalize_premultiplied_rgba(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let c = Color::from_premultiplied(px[0], px[1], px[2], px[3]);
        px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
    }
}
