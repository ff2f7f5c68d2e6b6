//! One palette index per byte.

use super::PanelEncoding;

/// 8 bits per pixel, indices copied as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytePerPixel;

impl PanelEncoding for BytePerPixel {
    fn name(&self) -> &'static str {
        "byte"
    }

    fn bits_per_pixel(&self) -> u8 {
        8
    }

    fn max_colors(&self) -> usize {
        256
    }

    fn encode_row(&self, row: &[u8], out: &mut Vec<u8>) {
        out.extend_from_slice(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_indices() {
        let mut out = vec![9];
        BytePerPixel.encode_row(&[0, 6, 2], &mut out);
        assert_eq!(out, vec![9, 0, 6, 2]);
    }
}
