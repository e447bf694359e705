// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pixel formats.
//!
//! A pixel format combines an alpha-transparency choice, a color model and,
//! for two API-only extensions, a byte count and channel order that the file
//! format itself cannot represent. Values below `0x10` are directly
//! persistable by the container (the BGRA family); values at or above `0x10`
//! only ever appear at the API boundary and are swizzled away on entry/exit.

use crate::error::{QoirError, Result};

/// A pixel format tag. [`PixelFormat::to_raw`]/[`PixelFormat::from_raw`]
/// round-trip the header byte the container persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Opaque, blue-green-red-padding byte order. File-representable.
    Bgrx,
    /// Non-premultiplied alpha, BGRA byte order. File-representable.
    BgraNonpremul,
    /// Premultiplied alpha, BGRA byte order. File-representable.
    BgraPremul,
    /// Opaque, 3 bytes per pixel, BGR byte order. API-only.
    Bgr,
    /// Opaque, RGBA byte order (padding alpha). API-only.
    Rgbx,
    /// Non-premultiplied alpha, RGBA byte order. API-only.
    RgbaNonpremul,
    /// Premultiplied alpha, RGBA byte order. API-only.
    RgbaPremul,
    /// Opaque, 3 bytes per pixel, RGB byte order. API-only.
    Rgb,
}

impl PixelFormat {
    /// The raw byte this format round-trips to/from (e.g. `0x31` for `Rgb`).
    pub fn to_raw(self) -> u8 {
        match self {
            PixelFormat::Bgrx => 0x01,
            PixelFormat::BgraNonpremul => 0x02,
            PixelFormat::BgraPremul => 0x03,
            PixelFormat::Bgr => 0x11,
            PixelFormat::Rgbx => 0x21,
            PixelFormat::RgbaNonpremul => 0x22,
            PixelFormat::RgbaPremul => 0x23,
            PixelFormat::Rgb => 0x31,
        }
    }

    /// Parses a raw pixel-format byte. Fails with [`QoirError::InvalidData`]
    /// if `raw` is not one of the eight recognized values.
    pub fn from_raw(raw: u8) -> Result<Self> {
        match raw {
            0x01 => Ok(PixelFormat::Bgrx),
            0x02 => Ok(PixelFormat::BgraNonpremul),
            0x03 => Ok(PixelFormat::BgraPremul),
            0x11 => Ok(PixelFormat::Bgr),
            0x21 => Ok(PixelFormat::Rgbx),
            0x22 => Ok(PixelFormat::RgbaNonpremul),
            0x23 => Ok(PixelFormat::RgbaPremul),
            0x31 => Ok(PixelFormat::Rgb),
            _ => Err(QoirError::InvalidData),
        }
    }

    /// `3` for the two 3-bytes-per-pixel formats, else `4`.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgr | PixelFormat::Rgb => 3,
            _ => 4,
        }
    }

    /// Whether the container's `QOIR` chunk can persist this format directly
    /// (the BGRA family; everything else is API-only and gets swizzled at
    /// the boundary).
    pub fn is_file_representable(self) -> bool {
        matches!(self, PixelFormat::Bgrx | PixelFormat::BgraNonpremul | PixelFormat::BgraPremul)
    }
}

/// A pixel format, width and height triple. Width and height are each
/// bounded to fit in 24 bits (`<= 0x00FF_FFFF`), matching the container's
/// header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelConfiguration {
    /// The pixel format.
    pub pixfmt: PixelFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The maximum (inclusive) value either dimension of a [`PixelConfiguration`]
/// may take.
pub const MAX_DIMENSION: u32 = 0x00FF_FFFF;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trips_for_every_variant() {
        for fmt in [
            PixelFormat::Bgrx,
            PixelFormat::BgraNonpremul,
            PixelFormat::BgraPremul,
            PixelFormat::Bgr,
            PixelFormat::Rgbx,
            PixelFormat::RgbaNonpremul,
            PixelFormat::RgbaPremul,
            PixelFormat::Rgb,
        ] {
            assert_eq!(PixelFormat::from_raw(fmt.to_raw()).unwrap(), fmt);
        }
    }

    #[test]
    fn bytes_per_pixel_matches_three_byte_formats() {
        assert_eq!(PixelFormat::Rgb.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Bgr.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::RgbaNonpremul.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::Bgrx.bytes_per_pixel(), 4);
    }

    #[test]
    fn only_bgra_family_is_file_representable() {
        assert!(PixelFormat::Bgrx.is_file_representable());
        assert!(PixelFormat::BgraNonpremul.is_file_representable());
        assert!(PixelFormat::BgraPremul.is_file_representable());
        assert!(!PixelFormat::Rgb.is_file_representable());
        assert!(!PixelFormat::RgbaNonpremul.is_file_representable());
    }

    #[test]
    fn from_raw_rejects_unknown_byte() {
        assert_eq!(PixelFormat::from_raw(0x00), Err(QoirError::InvalidData));
        assert_eq!(PixelFormat::from_raw(0xAB), Err(QoirError::InvalidData));
    }
}
