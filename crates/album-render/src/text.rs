//! Text measurement, fitting, and drawing.
//!
//! Every string drawn on the canvas goes through [`wrap_text`] or
//! [`truncate_to_width`] first, so nothing ever runs past its region.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;

/// Suffix appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width(font: &FontArc, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the line height for the given font and scale.
pub fn line_height(font: &FontArc, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Return `text` unchanged if it fits in `max_width`, otherwise the
/// longest prefix that fits once [`ELLIPSIS`] is appended.
///
/// Returns an empty string when not even the ellipsis fits.
pub fn truncate_to_width(font: &FontArc, scale: PxScale, text: &str, max_width: u32) -> String {
    if measure_text_width(font, scale, text) <= max_width {
        return text.to_string();
    }
    truncate_with_ellipsis(font, scale, text, max_width)
}

/// Like [`truncate_to_width`], but always ends in an ellipsis (used when
/// text continues past the last visible line).
fn truncate_with_ellipsis(font: &FontArc, scale: PxScale, text: &str, max_width: u32) -> String {
    let mut kept = text.trim_end().to_string();
    loop {
        let candidate = format!("{kept}{ELLIPSIS}");
        if measure_text_width(font, scale, &candidate) <= max_width {
            return candidate;
        }
        if kept.pop().is_none() {
            return String::new();
        }
        let trimmed = kept.trim_end().len();
        kept.truncate(trimmed);
    }
}

/// Word-wrap `text` into at most `max_lines` lines of `max_width` pixels.
///
/// If words are left over after the last line, that line ends in an
/// ellipsis. A single word wider than the region is truncated rather than
/// broken.
pub fn wrap_text(
    font: &FontArc,
    scale: PxScale,
    text: &str,
    max_width: u32,
    max_lines: usize,
) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure_text_width(font, scale, &candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let overflowed = lines.len() > max_lines;
    lines.truncate(max_lines);

    let last = lines.len().saturating_sub(1);
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if overflowed && i == last {
                truncate_with_ellipsis(font, scale, &line, max_width)
            } else {
                truncate_to_width(font, scale, &line, max_width)
            }
        })
        .collect()
}

/// Draw a single line of text with its top-left corner at `(x, y)`.
pub fn draw_text(
    img: &mut RgbImage,
    font: &FontArc,
    scale: PxScale,
    x: i32,
    y: i32,
    text: &str,
    color: Rgb<u8>,
) {
    if !text.is_empty() {
        draw_text_mut(img, color, x, y, scale, font, text);
    }
}

/// X offset that centers `text` within `width` pixels.
pub fn centered_offset(font: &FontArc, scale: PxScale, text: &str, width: u32) -> i32 {
    let text_width = measure_text_width(font, scale, text) as i32;
    ((width as i32) - text_width).max(0) / 2
}
