//! Per-panel pixel encodings.
//!
//! - Packed 4-bit: two pixels per byte, first pixel in the high nibble
//!   (Inky Impression / UC8159-style controllers)
//! - Byte per pixel: one palette index per byte

pub mod byte;
pub mod packed;

pub use byte::BytePerPixel;
pub use packed::Packed4Bit;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Trait implemented by each panel's pixel encoding.
///
/// Rows are handed over one at a time as raw palette indices
/// (1 byte per pixel, already range-checked by [`crate::encode_frame`]).
pub trait PanelEncoding: Send + Sync {
    /// Human-readable encoding name (e.g. "packed4").
    fn name(&self) -> &'static str;

    /// Bits used to store a single pixel.
    fn bits_per_pixel(&self) -> u8;

    /// Largest palette the encoding can address.
    fn max_colors(&self) -> usize {
        1usize << self.bits_per_pixel()
    }

    /// Number of bytes a single encoded row occupies.
    fn row_len(&self, width: u32) -> usize {
        (width as usize * usize::from(self.bits_per_pixel())).div_ceil(8)
    }

    /// Total encoded size of a `width` x `height` frame.
    fn encoded_len(&self, width: u32, height: u32) -> usize {
        self.row_len(width) * height as usize
    }

    /// Append the encoded form of one row of palette indices to `out`.
    fn encode_row(&self, row: &[u8], out: &mut Vec<u8>);
}

/// Configurable selection of a [`PanelEncoding`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Two pixels per byte (default for 7-color Inky panels).
    #[default]
    Packed4,
    /// One pixel per byte.
    Byte,
}

impl PixelFormat {
    /// The encoder implementing this format.
    pub fn encoding(self) -> &'static dyn PanelEncoding {
        match self {
            PixelFormat::Packed4 => &Packed4Bit,
            PixelFormat::Byte => &BytePerPixel,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoding().name())
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "packed4" => Ok(PixelFormat::Packed4),
            "byte" => Ok(PixelFormat::Byte),
            other => Err(format!(
                "unknown pixel format '{other}' (expected 'packed4' or 'byte')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_parse_and_display() {
        assert_eq!("packed4".parse::<PixelFormat>(), Ok(PixelFormat::Packed4));
        assert_eq!("byte".parse::<PixelFormat>(), Ok(PixelFormat::Byte));
        assert!("rgb".parse::<PixelFormat>().is_err());
        assert_eq!(PixelFormat::Packed4.to_string(), "packed4");
        assert_eq!(PixelFormat::Byte.to_string(), "byte");
    }

    #[test]
    fn test_pixel_format_serde_lowercase() {
        let json = serde_json::to_string(&PixelFormat::Byte).unwrap();
        assert_eq!(json, "\"byte\"");
        let parsed: PixelFormat = serde_json::from_str("\"packed4\"").unwrap();
        assert_eq!(parsed, PixelFormat::Packed4);
    }

    #[test]
    fn test_default_row_len() {
        assert_eq!(Packed4Bit.row_len(800), 400);
        assert_eq!(Packed4Bit.row_len(3), 2);
        assert_eq!(BytePerPixel.row_len(800), 800);
        assert_eq!(Packed4Bit.max_colors(), 16);
        assert_eq!(BytePerPixel.max_colors(), 256);
    }
}
