//! Paints album content onto a truecolor canvas following a [`Layout`].

use ab_glyph::PxScale;
use image::{Luma, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_filled_rect_mut;
use tracing::{debug, warn};

use crate::content::AlbumContent;
use crate::fonts::{FontSet, FontWeight};
use crate::layout::{
    Backdrop, Layout, Outline, Rect, Region, RegionKind, TextAlign, TextSource, TextStyle,
};
use crate::normalize::normalize_cover;
use crate::palette::Palette;
use crate::qr::generate_qr;
use crate::text::{
    centered_offset, draw_text, line_height, measure_text_width, truncate_to_width, wrap_text,
};
use crate::{RenderError, Result};

/// Horizontal offset of a track name from the start of its row.
pub const TRACK_NAME_INDENT: u32 = 34;

/// Drawn after the name of a highlighted track.
pub const HIGHLIGHT_MARKER: &str = "*";
const MARKER_GAP: u32 = 4;

/// Shown in the photo region when the album has no cover.
pub const PLACEHOLDER_TEXT: &str = "NO COVER";

const PURE_BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const PURE_WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Paint `content` onto a fresh canvas.
///
/// Non-text regions are painted first in z order, text regions last. The
/// returned canvas has exactly the layout's dimensions.
pub fn compose(content: &AlbumContent, layout: &Layout, palette: &Palette) -> Result<RgbImage> {
    let mut canvas = RgbImage::from_pixel(
        layout.width(),
        layout.height(),
        lookup(palette, layout.background())?,
    );

    for region in layout.paint_order() {
        debug!(region = %region.name, z = region.z, "Painting region");
        match &region.content {
            RegionKind::Panel { color } => {
                fill_rect(&mut canvas, &region.rect, lookup(palette, *color)?);
            }
            RegionKind::Photo { outline } => {
                paint_photo(&mut canvas, &region.rect, content, layout.fonts())?;
                if let Some(outline) = outline {
                    draw_outline(&mut canvas, &region.rect, outline, palette)?;
                }
            }
            RegionKind::Code => paint_code(&mut canvas, region, &content.url)?,
            RegionKind::Text(style) => {
                paint_text(&mut canvas, region, style, content, layout, palette)?
            }
        }
    }

    Ok(canvas)
}

fn lookup(palette: &Palette, index: u8) -> Result<Rgb<u8>> {
    palette.get(index).ok_or_else(|| {
        RenderError::Layout(format!(
            "color {index} is not in the {}-color palette",
            palette.len()
        ))
    })
}

fn fill_rect(canvas: &mut RgbImage, rect: &Rect, color: Rgb<u8>) {
    if rect.is_empty() {
        return;
    }
    let area =
        imageproc::rect::Rect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height);
    draw_filled_rect_mut(canvas, area, color);
}

fn paint_photo(
    canvas: &mut RgbImage,
    rect: &Rect,
    content: &AlbumContent,
    fonts: &FontSet,
) -> Result<()> {
    let photo = match content.cover.as_deref() {
        Some(bytes) => normalize_cover(bytes, rect.width, rect.height)?,
        None => {
            debug!("No cover image, drawing placeholder");
            cover_placeholder(rect.width, rect.height, fonts)
        }
    };
    imageops::replace(canvas, &photo, i64::from(rect.x), i64::from(rect.y));
    Ok(())
}

/// Black square with a centered white caption.
fn cover_placeholder(width: u32, height: u32, fonts: &FontSet) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, PURE_BLACK);
    let font = fonts.get(FontWeight::Bold);
    let scale = PxScale::from((width.min(height) as f32 / 10.0).max(8.0));
    let caption = truncate_to_width(font, scale, PLACEHOLDER_TEXT, width);
    let x = centered_offset(font, scale, &caption, width);
    let y = (height as i32 - line_height(font, scale) as i32).max(0) / 2;
    draw_text(&mut img, font, scale, x, y, &caption, PURE_WHITE);
    img
}

/// Border of `outline.width` pixels just inside `rect`.
fn draw_outline(
    canvas: &mut RgbImage,
    rect: &Rect,
    outline: &Outline,
    palette: &Palette,
) -> Result<()> {
    let color = lookup(palette, outline.color)?;
    let t = outline.width;
    if t == 0 {
        return Ok(());
    }
    let Rect { x, y, width, height } = *rect;
    fill_rect(canvas, &Rect::new(x, y, width, t), color);
    fill_rect(canvas, &Rect::new(x, y + height - t, width, t), color);
    fill_rect(canvas, &Rect::new(x, y, t, height), color);
    fill_rect(canvas, &Rect::new(x + width - t, y, t, height), color);
    Ok(())
}

fn paint_code(canvas: &mut RgbImage, region: &Region, url: &str) -> Result<()> {
    if url.is_empty() {
        debug!(region = %region.name, "No URL, leaving code region blank");
        return Ok(());
    }
    let code = generate_qr(url, region.rect.width)?;
    for (px, py, Luma([value])) in code.enumerate_pixels() {
        let color = if *value == 0 { PURE_BLACK } else { PURE_WHITE };
        canvas.put_pixel(region.rect.x + px, region.rect.y + py, color);
    }
    Ok(())
}

fn paint_text(
    canvas: &mut RgbImage,
    region: &Region,
    style: &TextStyle,
    content: &AlbumContent,
    layout: &Layout,
    palette: &Palette,
) -> Result<()> {
    let rect = &region.rect;

    let background = match layout.backdrop(rect) {
        Backdrop::Solid(color) => color,
        Backdrop::Busy => {
            debug!(region = %region.name, "Text over busy content, painting backing");
            fill_rect(canvas, rect, lookup(palette, layout.backing())?);
            layout.backing()
        }
    };
    let (fg_index, ratio) = palette.best_contrast(lookup(palette, background)?);
    let fg = lookup(palette, fg_index)?;
    debug!(region = %region.name, background, foreground = fg_index, ratio, "Text colors");

    let font = layout.fonts().get(style.weight);
    let scale = PxScale::from(style.size);
    let natural = line_height(font, scale);
    let pitch = style.line_pitch.unwrap_or(natural).max(1);
    let line_budget = style.max_lines.min(rect.height / pitch) as usize;
    if line_budget == 0 {
        warn!(
            region = %region.name,
            pitch,
            height = rect.height,
            "Text region is too short for one line"
        );
        return Ok(());
    }

    let text = match &style.source {
        TextSource::TrackList => {
            let rows = TrackRows {
                layout,
                scale,
                pitch,
                line_budget,
                fg,
                marker: lookup(palette, layout.highlight())?,
            };
            rows.paint(canvas, rect, style.weight, content);
            return Ok(());
        }
        TextSource::Title => content.title.clone(),
        TextSource::Artist => content.artist.clone(),
        TextSource::ReleaseYear => content.release_year().unwrap_or_default(),
        TextSource::Static(text) => text.clone(),
    };

    let lines = wrap_text(font, scale, &text, rect.width, line_budget);
    for (i, line) in lines.iter().enumerate() {
        let dx = match style.align {
            TextAlign::Left => 0,
            TextAlign::Center => centered_offset(font, scale, line, rect.width),
        };
        let y = rect.y + i as u32 * pitch;
        draw_text(canvas, font, scale, rect.x as i32 + dx, y as i32, line, fg);
    }
    Ok(())
}

/// Drawing parameters shared by every row of the track list.
struct TrackRows<'a> {
    layout: &'a Layout,
    scale: PxScale,
    pitch: u32,
    line_budget: usize,
    fg: Rgb<u8>,
    marker: Rgb<u8>,
}

impl TrackRows<'_> {
    fn paint(
        &self,
        canvas: &mut RgbImage,
        rect: &Rect,
        weight: FontWeight,
        content: &AlbumContent,
    ) {
        let number_font = self.layout.fonts().get(FontWeight::Bold);
        let name_font = self.layout.fonts().get(weight);
        let marker_room =
            measure_text_width(number_font, self.scale, HIGHLIGHT_MARKER) + MARKER_GAP;
        let left = rect.x as i32;
        let name_x = rect.x + TRACK_NAME_INDENT;

        let rows = content.track_rows();
        for (i, row) in rows.iter().take(self.line_budget).enumerate() {
            let y = (rect.y + i as u32 * self.pitch) as i32;

            let number = truncate_to_width(number_font, self.scale, &row.number, rect.width);
            draw_text(canvas, number_font, self.scale, left, y, &number, self.fg);

            let mut budget = rect.width.saturating_sub(TRACK_NAME_INDENT);
            if row.highlighted {
                budget = budget.saturating_sub(marker_room);
            }
            let name = truncate_to_width(name_font, self.scale, &row.name, budget);
            let x = name_x as i32;
            draw_text(canvas, name_font, self.scale, x, y, &name, self.fg);

            if row.highlighted && budget > 0 {
                let marker_x =
                    name_x + measure_text_width(name_font, self.scale, &name) + MARKER_GAP;
                draw_text(
                    canvas,
                    number_font,
                    self.scale,
                    marker_x as i32,
                    y,
                    HIGHLIGHT_MARKER,
                    self.marker,
                );
            }
        }
    }
}
