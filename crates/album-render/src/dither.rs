//! Palette quantization with Floyd-Steinberg error diffusion.
//!
//! Reduces a truecolor canvas to panel palette indices. Pixels are visited
//! strictly in raster order and each pixel's quantization error is pushed
//! onto its unvisited neighbors:
//! - Right:        7/16
//! - Bottom-left:  3/16
//! - Bottom:       5/16
//! - Bottom-right: 1/16
//!
//! Every row depends on error diffused from the row above, so the scan is
//! sequential by construction.

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::palette::Palette;
use crate::{RenderError, Result};

/// A canvas of palette indices, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedCanvas {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl QuantizedCanvas {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Palette index at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the canvas.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) out of bounds"
        );
        self.indices[y as usize * self.width as usize + x as usize]
    }

    /// All indices in raster order.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Render the indices back to their palette colors (for previews).
    pub fn to_rgb_image(&self, palette: &Palette) -> Result<RgbImage> {
        let mut img = RgbImage::new(self.width, self.height);
        for (pixel, &index) in img.pixels_mut().zip(&self.indices) {
            *pixel = palette.get(index).ok_or_else(|| {
                RenderError::Palette(format!(
                    "index {index} has no color in a {}-color palette",
                    palette.len()
                ))
            })?;
        }
        Ok(img)
    }
}

/// Quantize a truecolor image to `palette` using Floyd-Steinberg dithering.
///
/// The working buffer is `f32` and is never clamped; nearest-color lookups
/// see the raw accumulated values. Output is deterministic for a given
/// input and palette.
pub fn floyd_steinberg_quantize(img: &RgbImage, palette: &Palette) -> QuantizedCanvas {
    let (width, height) = img.dimensions();
    debug!(
        width,
        height,
        colors = palette.len(),
        "Applying Floyd-Steinberg dithering"
    );

    let mut buffer: Vec<[f32; 3]> = img
        .pixels()
        .map(|p| [f32::from(p[0]), f32::from(p[1]), f32::from(p[2])])
        .collect();
    let mut indices = vec![0u8; buffer.len()];

    for y in 0..height {
        for x in 0..width {
            let idx = y as usize * width as usize + x as usize;
            let current = buffer[idx];
            let index = palette.nearest(current);
            indices[idx] = index;

            let Rgb(chosen) = palette.colors()[usize::from(index)];
            let error = [
                current[0] - f32::from(chosen[0]),
                current[1] - f32::from(chosen[1]),
                current[2] - f32::from(chosen[2]),
            ];
            distribute_error(&mut buffer, x, y, width, height, error);
        }
    }

    debug!("Floyd-Steinberg dithering complete");
    QuantizedCanvas {
        width,
        height,
        indices,
    }
}

/// Distribute quantization error to neighboring pixels.
fn distribute_error(
    buffer: &mut [[f32; 3]],
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    error: [f32; 3],
) {
    let w = width as usize;
    let idx = y as usize * w + x as usize;

    // Right: 7/16
    if x + 1 < width {
        add_scaled(&mut buffer[idx + 1], error, 7.0 / 16.0);
    }
    if y + 1 < height {
        // Bottom-left: 3/16
        if x > 0 {
            add_scaled(&mut buffer[idx + w - 1], error, 3.0 / 16.0);
        }
        // Bottom: 5/16
        add_scaled(&mut buffer[idx + w], error, 5.0 / 16.0);
        // Bottom-right: 1/16
        if x + 1 < width {
            add_scaled(&mut buffer[idx + w + 1], error, 1.0 / 16.0);
        }
    }
}

fn add_scaled(target: &mut [f32; 3], error: [f32; 3], weight: f32) {
    for (t, e) in target.iter_mut().zip(error) {
        *t += e * weight;
    }
}
