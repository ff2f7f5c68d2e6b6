//! Frame encoders for multi-color e-paper panels.
//!
//! Turns a row-major buffer of palette indices into the byte layout a
//! display driver expects, validating every index on the way.

pub mod format;

// Re-exports for convenience
pub use format::{BytePerPixel, Packed4Bit, PanelEncoding, PixelFormat};

use tracing::debug;

/// Errors that can occur while encoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Palette index {index} at ({x}, {y}) is outside a {palette_len}-color palette")]
    IndexOutOfRange {
        index: u8,
        x: u32,
        y: u32,
        palette_len: usize,
    },

    #[error("Frame buffer holds {actual} pixels, expected {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("{encoding} encoding cannot address a {palette_len}-color palette")]
    PaletteTooLarge {
        encoding: &'static str,
        palette_len: usize,
    },
}

/// Result type alias for encoding operations.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Encode a full frame of palette indices.
///
/// `indices` is row-major, `width * height` entries long. Every index is
/// checked against `palette_len` before any output is produced, so the
/// result is either a complete buffer or an error.
pub fn encode_frame(
    encoding: &dyn PanelEncoding,
    indices: &[u8],
    width: u32,
    height: u32,
    palette_len: usize,
) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize;
    if indices.len() != expected {
        return Err(EncodeError::DimensionMismatch {
            width,
            height,
            actual: indices.len(),
        });
    }

    if palette_len > encoding.max_colors() {
        return Err(EncodeError::PaletteTooLarge {
            encoding: encoding.name(),
            palette_len,
        });
    }

    if let Some(pos) = indices.iter().position(|&i| usize::from(i) >= palette_len) {
        let w = width as usize;
        return Err(EncodeError::IndexOutOfRange {
            index: indices[pos],
            x: (pos % w) as u32,
            y: (pos / w) as u32,
            palette_len,
        });
    }

    let mut out = Vec::with_capacity(encoding.encoded_len(width, height));
    if width > 0 {
        for row in indices.chunks(width as usize) {
            encoding.encode_row(row, &mut out);
        }
    }

    debug!(
        encoding = encoding.name(),
        width,
        height,
        bytes = out.len(),
        "Frame encoded"
    );
    Ok(out)
}
