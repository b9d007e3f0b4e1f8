// src/color.rs

//! Packed 32-bit ARGB color and the integer pixel layouts used on export.

use serde::{Deserialize, Serialize};

/// A color packed as `0xAARRGGBB`.
///
/// This is the only pixel representation the engine knows about. Two colors
/// are the same pixel value iff their packed integers are equal; there is no
/// tolerance or distance metric anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Argb(pub u32);

impl Argb {
    pub const TRANSPARENT: Argb = Argb(0x0000_0000);
    pub const BLACK: Argb = Argb(0xFF00_0000);
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Argb((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0xFF, r, g, b)
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Convert to RGBA byte order.
    pub const fn to_rgba_bytes(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Argb(value)
    }
}

impl From<Argb> for u32 {
    fn from(color: Argb) -> Self {
        color.0
    }
}

/// Integer layout of exported pixels.
///
/// The engine always renders `Argb`; the format is applied only when the
/// canvas is handed to an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// `0xAARRGGBB`, unchanged.
    #[default]
    Argb,
    /// `0x00RRGGBB`, alpha discarded.
    Rgb,
    /// `0x00BBGGRR`, alpha discarded.
    Bgr,
}

impl PixelFormat {
    /// Re-pack one engine color into this layout.
    pub const fn pack(self, color: Argb) -> u32 {
        match self {
            PixelFormat::Argb => color.0,
            PixelFormat::Rgb => color.0 & 0x00FF_FFFF,
            PixelFormat::Bgr => {
                (color.b() as u32) << 16 | (color.g() as u32) << 8 | color.r() as u32
            }
        }
    }
}
