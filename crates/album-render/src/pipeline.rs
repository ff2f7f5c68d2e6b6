//! End-to-end rendering: compose, quantize, encode.

use image::RgbImage;
use panel_encoding::{PixelFormat, encode_frame};
use tracing::info;

use crate::Result;
use crate::compose::compose;
use crate::content::AlbumContent;
use crate::dither::{QuantizedCanvas, floyd_steinberg_quantize};
use crate::layout::Layout;
use crate::palette::Palette;

/// A rendered frame before encoding.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The composited truecolor canvas.
    pub canvas: RgbImage,
    /// The canvas reduced to palette indices.
    pub quantized: QuantizedCanvas,
}

impl Frame {
    /// The quantized frame in palette colors, as the panel will show it.
    pub fn preview(&self, palette: &Palette) -> Result<RgbImage> {
        self.quantized.to_rgb_image(palette)
    }

    /// Encode the quantized frame for the display driver.
    pub fn encode(&self, format: PixelFormat, palette: &Palette) -> Result<Vec<u8>> {
        let (width, height) = self.quantized.dimensions();
        let encoded = encode_frame(
            format.encoding(),
            self.quantized.indices(),
            width,
            height,
            palette.len(),
        )?;
        info!(bytes = encoded.len(), format = %format, "Frame encoded");
        Ok(encoded)
    }
}

/// Compose and quantize `content`, stopping before encoding.
pub fn render(content: &AlbumContent, palette: &Palette, layout: &Layout) -> Result<Frame> {
    layout.check_palette(palette)?;

    info!(
        title = %content.title,
        width = layout.width(),
        height = layout.height(),
        "Rendering album frame"
    );
    let canvas = compose(content, layout, palette)?;
    let quantized = floyd_steinberg_quantize(&canvas, palette);

    Ok(Frame { canvas, quantized })
}

/// Render `content` and encode it in the layout's pixel format.
///
/// Returns either a complete buffer or an error, never a partial buffer.
pub fn compose_and_quantize(
    content: &AlbumContent,
    palette: &Palette,
    layout: &Layout,
) -> Result<Vec<u8>> {
    let frame = render(content, palette, layout)?;
    frame.encode(layout.pixel_format(), palette)
}
