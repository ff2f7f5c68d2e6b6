//! Packed 4-bit encoding.
//!
//! Two pixels share one byte: the left pixel in the high nibble, the right
//! pixel in the low nibble. Odd-width rows are padded with a zero nibble so
//! every row starts on a byte boundary.

use super::PanelEncoding;

/// 4 bits per pixel, high nibble first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Packed4Bit;

impl PanelEncoding for Packed4Bit {
    fn name(&self) -> &'static str {
        "packed4"
    }

    fn bits_per_pixel(&self) -> u8 {
        4
    }

    fn encode_row(&self, row: &[u8], out: &mut Vec<u8>) {
        out.extend(row.chunks(2).map(|pair| {
            let hi = pair[0] & 0x0f;
            let lo = pair.get(1).map_or(0, |&px| px & 0x0f);
            (hi << 4) | lo
        }));
    }
}
