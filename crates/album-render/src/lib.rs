//! Album frame rendering for 7-color e-paper panels.
//!
//! Composes a cover photo, album metadata and a QR code onto a fixed
//! layout, reduces the result to the panel palette with Floyd-Steinberg
//! error diffusion, and encodes it for the display driver.

pub mod compose;
pub mod content;
pub mod dither;
pub mod fonts;
pub mod layout;
pub mod normalize;
pub mod palette;
pub mod pipeline;
pub mod qr;
pub mod text;

// Re-exports for convenience
pub use compose::compose;
pub use content::{AlbumContent, Track};
pub use dither::{QuantizedCanvas, floyd_steinberg_quantize};
pub use fonts::{FontSet, FontWeight};
pub use layout::{Layout, LayoutConfig, Rect, Region, RegionKind};
pub use palette::Palette;
pub use panel_encoding::PixelFormat;
pub use pipeline::{Frame, compose_and_quantize, render};

/// Errors that can occur while rendering a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Palette error: {0}")]
    Palette(String),

    #[error("Code generation error: {0}")]
    Code(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error(transparent)]
    Encode(#[from] panel_encoding::EncodeError),
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
