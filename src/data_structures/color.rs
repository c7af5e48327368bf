//! Linear RGB colours parsed from the hex notation used by the debug panel.
//!
//! Colours are authored in sRGB (`#1c7f8d`, `0x1a1a1a`) but shaders and the
//! clear colour work in linear space, so parsing converts with the standard
//! sRGB transfer function and [`Color::to_srgb_hex`] converts back.

use std::fmt;

use anyhow::{Context, bail};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Create a colour from linear components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a packed `0xrrggbb` sRGB value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as u8;
        let g = ((hex >> 8) & 0xff) as u8;
        let b = (hex & 0xff) as u8;
        Self::from_srgb8(r, g, b)
    }

    /// Parse `#rrggbb`. The leading `#` is optional, the six digits are case-insensitive.
    pub fn from_hex_str(s: &str) -> anyhow::Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            bail!("expected a colour like #rrggbb, got {s:?}");
        }
        let hex = u32::from_str_radix(digits, 16)
            .with_context(|| format!("{s:?} is not a hexadecimal colour"))?;
        Ok(Self::from_hex(hex))
    }

    pub fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
        }
    }

    pub fn to_srgb8(&self) -> [u8; 3] {
        let f_to_u8 = |v: f32| (linear_to_srgb(v).clamp(0.0, 1.0) * 255.0).round() as u8;
        [f_to_u8(self.r), f_to_u8(self.g), f_to_u8(self.b)]
    }

    pub fn to_srgb_hex(&self) -> u32 {
        let [r, g, b] = self.to_srgb8();
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    pub fn to_vec4(&self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }

    pub fn to_wgpu(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: 1.0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_srgb_hex())
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
