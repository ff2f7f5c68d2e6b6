//! Region layout of the panel.
//!
//! A layout is a fixed canvas size plus an ordered list of rectangular
//! regions (solid panels, the cover photo, the QR code, and text blocks).
//! It is validated once, when it is built, and never changes afterwards.

use panel_encoding::PixelFormat;
use serde::{Deserialize, Serialize};

use crate::fonts::{FontSet, FontWeight};
use crate::palette::{self, Palette};
use crate::{RenderError, Result};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Minimum WCAG contrast between text and whatever sits behind it.
pub const MIN_TEXT_CONTRAST: f32 = 4.5;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && u64::from(self.x) < other.right()
            && u64::from(other.x) < self.right()
            && u64::from(self.y) < other.bottom()
            && u64::from(other.y) < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// What a text region shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Title,
    Artist,
    ReleaseYear,
    TrackList,
    /// Fixed label text.
    Static(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub source: TextSource,
    /// Font size in pixels.
    pub size: f32,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default = "default_max_lines")]
    pub max_lines: u32,
    /// Distance between baselines; defaults to the font's line height.
    #[serde(default)]
    pub line_pitch: Option<u32>,
}

fn default_max_lines() -> u32 {
    1
}

/// Border drawn just inside a photo region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub width: u32,
    pub color: u8,
}

/// Content painted into a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionKind {
    /// Solid fill with a palette color.
    Panel { color: u8 },
    /// The normalized cover image.
    Photo {
        #[serde(default)]
        outline: Option<Outline>,
    },
    /// The QR code for the album URL. Must be square.
    Code,
    Text(TextStyle),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub rect: Rect,
    /// Paint order among regions of the same layer; lower paints first.
    #[serde(default)]
    pub z: i32,
    pub content: RegionKind,
}

impl Region {
    pub fn new(name: impl Into<String>, rect: Rect, z: i32, content: RegionKind) -> Self {
        Self {
            name: name.into(),
            rect,
            z,
            content,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.content, RegionKind::Text(_))
    }
}

/// What sits behind a text region once everything else is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    /// A single known palette color.
    Solid(u8),
    /// Photo, code, or mixed content: needs a backing rectangle.
    Busy,
}

/// Serializable layout description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub width: u32,
    pub height: u32,
    /// Canvas fill color.
    #[serde(default = "default_background")]
    pub background: u8,
    /// Fill behind text that would otherwise sit on busy content.
    #[serde(default = "default_backing")]
    pub backing: u8,
    /// Color of the marker after highlighted tracks.
    #[serde(default = "default_highlight")]
    pub highlight: u8,
    #[serde(default)]
    pub pixel_format: PixelFormat,
    pub regions: Vec<Region>,
}

fn default_background() -> u8 {
    palette::WHITE
}

fn default_backing() -> u8 {
    palette::BLACK
}

fn default_highlight() -> u8 {
    palette::ORANGE
}

impl LayoutConfig {
    /// Album-of-the-day layout for the 800x480 Inky Impression.
    ///
    /// ```text
    /// +-----------------+--------------------------------+
    /// |  (black panel)  | [ALBUM OF THE DAY]             |
    /// |  +-----------+  | Title (2 lines)                |
    /// |  |   cover   |  | Artist                         |
    /// |  |  300x300  |  | ------------------             |
    /// |  +-----------+  | TOP TRACKS                     |
    /// |      1969       | 01 ...               +------+  |
    /// |                 | 05 ...               |  QR  |  |
    /// +-----------------+--------------------------------+
    /// ```
    pub fn inky_impression() -> Self {
        use RegionKind::{Code, Panel, Photo, Text};

        let text = |source, size, weight, max_lines, line_pitch| {
            Text(TextStyle {
                source,
                size,
                weight,
                align: TextAlign::Left,
                max_lines,
                line_pitch,
            })
        };

        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: palette::WHITE,
            backing: palette::BLACK,
            highlight: palette::ORANGE,
            pixel_format: PixelFormat::Packed4,
            regions: vec![
                Region::new(
                    "cover_panel",
                    Rect::new(0, 0, 360, 480),
                    0,
                    Panel {
                        color: palette::BLACK,
                    },
                ),
                Region::new(
                    "cover",
                    Rect::new(30, 90, 300, 300),
                    1,
                    Photo {
                        outline: Some(Outline {
                            width: 4,
                            color: palette::WHITE,
                        }),
                    },
                ),
                Region::new(
                    "release_year",
                    Rect::new(30, 404, 300, 24),
                    0,
                    Text(TextStyle {
                        source: TextSource::ReleaseYear,
                        size: 14.0,
                        weight: FontWeight::Bold,
                        align: TextAlign::Center,
                        max_lines: 1,
                        line_pitch: None,
                    }),
                ),
                Region::new(
                    "badge",
                    Rect::new(395, 40, 190, 28),
                    0,
                    Panel {
                        color: palette::RED,
                    },
                ),
                Region::new(
                    "badge_label",
                    Rect::new(407, 45, 170, 18),
                    0,
                    text(
                        TextSource::Static("ALBUM OF THE DAY".into()),
                        11.0,
                        FontWeight::Bold,
                        1,
                        None,
                    ),
                ),
                Region::new(
                    "title",
                    Rect::new(395, 90, 270, 92),
                    0,
                    text(TextSource::Title, 38.0, FontWeight::Bold, 2, Some(44)),
                ),
                Region::new(
                    "artist",
                    Rect::new(395, 186, 270, 30),
                    0,
                    text(TextSource::Artist, 24.0, FontWeight::Regular, 1, None),
                ),
                Region::new(
                    "rule",
                    Rect::new(395, 224, 270, 3),
                    0,
                    Panel {
                        color: palette::BLACK,
                    },
                ),
                Region::new(
                    "tracks_header",
                    Rect::new(395, 242, 270, 18),
                    0,
                    text(
                        TextSource::Static("TOP TRACKS".into()),
                        12.0,
                        FontWeight::Bold,
                        1,
                        None,
                    ),
                ),
                Region::new(
                    "tracks",
                    Rect::new(395, 268, 270, 125),
                    0,
                    text(
                        TextSource::TrackList,
                        14.0,
                        FontWeight::Regular,
                        5,
                        Some(25),
                    ),
                ),
                Region::new("qr", Rect::new(665, 340, 100, 100), 0, Code),
            ],
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::inky_impression()
    }
}

/// A validated layout plus the fonts its text regions use.
#[derive(Debug, Clone)]
pub struct Layout {
    config: LayoutConfig,
    fonts: FontSet,
}

impl Layout {
    /// Validate `config` and build a layout using the embedded fonts.
    ///
    /// Fails with [`RenderError::Layout`] if any region leaves the canvas,
    /// has no area, is malformed for its kind, or is a text region that
    /// overlaps another text region.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        validate_geometry(&config)?;
        Ok(Self {
            config,
            fonts: FontSet::embedded(),
        })
    }

    /// The default 800x480 album layout.
    pub fn inky_impression() -> Self {
        Self {
            config: LayoutConfig::inky_impression(),
            fonts: FontSet::embedded(),
        }
    }

    /// Replace the text faces.
    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn background(&self) -> u8 {
        self.config.background
    }

    pub fn backing(&self) -> u8 {
        self.config.backing
    }

    pub fn highlight(&self) -> u8 {
        self.config.highlight
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.config.pixel_format
    }

    pub fn regions(&self) -> &[Region] {
        &self.config.regions
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    /// Regions in paint order: non-text regions by ascending z, then text
    /// regions by ascending z. Ties keep configuration order.
    pub fn paint_order(&self) -> Vec<&Region> {
        let mut ordered: Vec<&Region> = self.config.regions.iter().collect();
        ordered.sort_by_key(|r| (r.is_text(), r.z));
        ordered
    }

    /// Classify what lies behind `rect` after all non-text regions are
    /// painted. The topmost intersecting region decides; a panel only
    /// counts as solid if it covers `rect` entirely.
    pub fn backdrop(&self, rect: &Rect) -> Backdrop {
        let topmost = self
            .paint_order()
            .into_iter()
            .filter(|r| !r.is_text())
            .rev()
            .find(|r| r.rect.intersects(rect));

        match topmost {
            None => Backdrop::Solid(self.config.background),
            Some(Region {
                rect: region_rect,
                content: RegionKind::Panel { color },
                ..
            }) if region_rect.contains(rect) => Backdrop::Solid(*color),
            Some(_) => Backdrop::Busy,
        }
    }

    /// Color the text in `rect` sits on: the solid backdrop, or the backing
    /// color when the backdrop is busy.
    pub fn text_background(&self, rect: &Rect) -> u8 {
        match self.backdrop(rect) {
            Backdrop::Solid(color) => color,
            Backdrop::Busy => self.config.backing,
        }
    }

    /// Check every palette reference and the text contrast guarantee
    /// against `palette`.
    pub fn check_palette(&self, palette: &Palette) -> Result<()> {
        let check = |index: u8, what: &str| {
            if palette.get(index).is_none() {
                return Err(RenderError::Layout(format!(
                    "{what} uses color {index}, palette has {}",
                    palette.len()
                )));
            }
            Ok(())
        };

        check(self.config.background, "background")?;
        check(self.config.backing, "backing")?;
        check(self.config.highlight, "highlight")?;

        for region in &self.config.regions {
            match &region.content {
                RegionKind::Panel { color } => check(*color, &format!("panel '{}'", region.name))?,
                RegionKind::Photo {
                    outline: Some(outline),
                } => check(outline.color, &format!("outline of '{}'", region.name))?,
                RegionKind::Text(_) => {
                    let background = self.text_background(&region.rect);
                    let Some(bg_color) = palette.get(background) else {
                        return Err(RenderError::Layout(format!(
                            "text '{}' sits on color {background}, palette has {}",
                            region.name,
                            palette.len()
                        )));
                    };
                    // Palettes always carry black and white, which clear the
                    // minimum against any backdrop; this only trips if that
                    // guarantee is ever loosened.
                    let (_, ratio) = palette.best_contrast(bg_color);
                    if ratio < MIN_TEXT_CONTRAST {
                        return Err(RenderError::Layout(format!(
                            "text '{}' reaches only {ratio:.2}:1 contrast",
                            region.name
                        )));
                    }
                }
                RegionKind::Photo { outline: None } | RegionKind::Code => {}
            }
        }
        Ok(())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::inky_impression()
    }
}

fn validate_geometry(config: &LayoutConfig) -> Result<()> {
    if config.width == 0 || config.height == 0 {
        return Err(RenderError::Layout(format!(
            "canvas {}x{} has no area",
            config.width, config.height
        )));
    }

    for region in &config.regions {
        let r = &region.rect;
        let name = &region.name;

        if r.is_empty() {
            return Err(RenderError::Layout(format!("region '{name}' has no area")));
        }
        if r.right() > u64::from(config.width) || r.bottom() > u64::from(config.height) {
            return Err(RenderError::Layout(format!(
                "region '{name}' ({},{} {}x{}) falls outside the {}x{} canvas",
                r.x, r.y, r.width, r.height, config.width, config.height
            )));
        }

        match &region.content {
            RegionKind::Code if r.width != r.height => {
                return Err(RenderError::Layout(format!(
                    "code region '{name}' must be square, got {}x{}",
                    r.width, r.height
                )));
            }
            RegionKind::Photo {
                outline: Some(outline),
            } if u64::from(outline.width) * 2 > u64::from(r.width.min(r.height)) => {
                return Err(RenderError::Layout(format!(
                    "outline of '{name}' is wider than the region"
                )));
            }
            RegionKind::Text(style) => {
                if !style.size.is_finite() || style.size <= 0.0 {
                    return Err(RenderError::Layout(format!(
                        "text '{name}' has invalid size {}",
                        style.size
                    )));
                }
                if style.max_lines == 0 {
                    return Err(RenderError::Layout(format!("text '{name}' allows no lines")));
                }
                if style.line_pitch == Some(0) {
                    return Err(RenderError::Layout(format!("text '{name}' has zero line pitch")));
                }
            }
            _ => {}
        }
    }

    // Backdrops are classified against non-text regions only, so a text
    // region may not sit on another one's backing.
    let texts: Vec<&Region> = config.regions.iter().filter(|r| r.is_text()).collect();
    for (i, a) in texts.iter().enumerate() {
        if let Some(b) = texts[i + 1..].iter().find(|b| b.rect.intersects(&a.rect)) {
            return Err(RenderError::Layout(format!(
                "text regions '{}' and '{}' overlap",
                a.name, b.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_named<'a>(layout: &'a Layout, name: &str) -> &'a Region {
        layout.regions().iter().find(|r| r.name == name).unwrap()
    }

    fn minimal_config(regions: Vec<Region>) -> LayoutConfig {
        LayoutConfig {
            width: 100,
            height: 60,
            background: palette::WHITE,
            backing: palette::BLACK,
            highlight: palette::ORANGE,
            pixel_format: PixelFormat::Packed4,
            regions,
        }
    }

    fn label(rect: Rect) -> Region {
        Region::new(
            "label",
            rect,
            0,
            RegionKind::Text(TextStyle {
                source: TextSource::Static("hi".into()),
                size: 12.0,
                weight: FontWeight::Regular,
                align: TextAlign::Left,
                max_lines: 1,
                line_pitch: None,
            }),
        )
    }

    #[test]
    fn test_default_layout_validates() {
        let layout = Layout::new(LayoutConfig::default()).unwrap();
        assert_eq!(layout.width(), DEFAULT_WIDTH);
        assert_eq!(layout.height(), DEFAULT_HEIGHT);
        layout.check_palette(&Palette::inky_impression()).unwrap();
    }

    #[test]
    fn test_default_layout_backdrops() {
        let layout = Layout::inky_impression();
        let backdrop = |name| layout.backdrop(&region_named(&layout, name).rect);
        assert_eq!(backdrop("release_year"), Backdrop::Solid(palette::BLACK));
        assert_eq!(backdrop("badge_label"), Backdrop::Solid(palette::RED));
        assert_eq!(backdrop("title"), Backdrop::Solid(palette::WHITE));
        assert_eq!(backdrop("tracks"), Backdrop::Solid(palette::WHITE));
    }

    #[test]
    fn test_rejects_region_outside_canvas() {
        let config = minimal_config(vec![label(Rect::new(90, 0, 20, 10))]);
        let err = Layout::new(config).unwrap_err();
        assert!(matches!(err, RenderError::Layout(_)));
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_rejects_overflowing_coordinates() {
        let config = minimal_config(vec![label(Rect::new(u32::MAX, 0, 2, 10))]);
        assert!(Layout::new(config).is_err());
    }

    #[test]
    fn test_rejects_zero_sized_region() {
        let config = minimal_config(vec![label(Rect::new(0, 0, 0, 10))]);
        assert!(Layout::new(config).is_err());
    }

    #[test]
    fn test_rejects_non_square_code() {
        let config = minimal_config(vec![Region::new(
            "qr",
            Rect::new(0, 0, 40, 30),
            0,
            RegionKind::Code,
        )]);
        assert!(Layout::new(config).is_err());
    }

    #[test]
    fn test_text_over_photo_is_busy() {
        let config = minimal_config(vec![
            Region::new(
                "photo",
                Rect::new(0, 0, 60, 60),
                0,
                RegionKind::Photo { outline: None },
            ),
            label(Rect::new(10, 40, 80, 15)),
        ]);
        let layout = Layout::new(config).unwrap();
        let caption = Rect::new(10, 40, 80, 15);
        assert_eq!(layout.backdrop(&caption), Backdrop::Busy);
        assert_eq!(layout.text_background(&caption), palette::BLACK);
        layout.check_palette(&Palette::inky_impression()).unwrap();
    }

    #[test]
    fn test_panel_above_photo_makes_backdrop_solid() {
        let config = minimal_config(vec![
            Region::new(
                "photo",
                Rect::new(0, 0, 60, 60),
                0,
                RegionKind::Photo { outline: None },
            ),
            Region::new(
                "strip",
                Rect::new(0, 40, 100, 20),
                5,
                RegionKind::Panel {
                    color: palette::BLUE,
                },
            ),
            label(Rect::new(10, 42, 80, 15)),
        ]);
        let layout = Layout::new(config).unwrap();
        assert_eq!(
            layout.backdrop(&Rect::new(10, 42, 80, 15)),
            Backdrop::Solid(palette::BLUE)
        );
        // Only partly on the strip: mixed content.
        assert_eq!(layout.backdrop(&Rect::new(10, 30, 80, 15)), Backdrop::Busy);
    }

    #[test]
    fn test_black_and_white_keep_every_backdrop_legible() {
        let palette = Palette::inky_impression();
        for level in 0..=255u8 {
            let (_, ratio) = palette.best_contrast(image::Rgb([level, level, level]));
            assert!(ratio >= MIN_TEXT_CONTRAST, "gray {level}: {ratio}");
        }
        for color in palette.colors() {
            assert!(palette.best_contrast(*color).1 >= MIN_TEXT_CONTRAST);
        }
    }

    #[test]
    fn test_rejects_overlapping_text_regions() {
        let mut config = minimal_config(vec![
            Region::new(
                "photo",
                Rect::new(0, 0, 100, 100),
                0,
                RegionKind::Photo { outline: None },
            ),
            label(Rect::new(50, 40, 150, 20)),
            Region {
                name: "title".into(),
                z: 1,
                ..label(Rect::new(110, 40, 90, 20))
            },
        ]);
        config.width = 200;
        config.height = 100;

        let err = Layout::new(config.clone()).unwrap_err();
        assert!(err.to_string().contains("overlap"), "{err}");

        // Moved clear of the first label, the title validates again.
        config.regions[2].rect = Rect::new(110, 70, 90, 20);
        Layout::new(config).unwrap();
    }

    #[test]
    fn test_touching_text_regions_are_allowed() {
        let config = minimal_config(vec![
            label(Rect::new(0, 0, 100, 20)),
            label(Rect::new(0, 20, 100, 20)),
        ]);
        assert!(Layout::new(config).is_ok());
    }

    #[test]
    fn test_rejects_unknown_palette_index() {
        let config = minimal_config(vec![Region::new(
            "panel",
            Rect::new(0, 0, 10, 10),
            0,
            RegionKind::Panel { color: 9 },
        )]);
        let layout = Layout::new(config).unwrap();
        assert!(layout.check_palette(&Palette::inky_impression()).is_err());
    }

    #[test]
    fn test_paint_order_puts_text_last() {
        let layout = Layout::inky_impression();
        let order = layout.paint_order();
        let first_text = order.iter().position(|r| r.is_text()).unwrap();
        assert!(order[first_text..].iter().all(|r| r.is_text()));
        assert!(order[..first_text].windows(2).all(|w| w[0].z <= w[1].z));
        assert_eq!(order[0].name, "cover_panel");
    }

    #[test]
    fn test_layout_config_json_round_trip() {
        let json = serde_json::to_string(&LayoutConfig::inky_impression()).unwrap();
        let parsed: LayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LayoutConfig::inky_impression());
    }

    #[test]
    fn test_layout_config_json_defaults() {
        let json = r#"{
            "width": 200,
            "height": 100,
            "regions": [
                {"name": "qr", "rect": {"x": 0, "y": 0, "width": 50, "height": 50},
                 "content": {"type": "code"}},
                {"name": "title", "rect": {"x": 60, "y": 0, "width": 140, "height": 30},
                 "content": {"type": "text", "source": "title", "size": 20}}
            ]
        }"#;
        let config: LayoutConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.background, palette::WHITE);
        assert_eq!(config.pixel_format, PixelFormat::Packed4);
        let RegionKind::Text(style) = &config.regions[1].content else {
            panic!("expected text region");
        };
        assert_eq!(style.max_lines, 1);
        assert_eq!(style.weight, FontWeight::Regular);
        assert!(Layout::new(config).is_ok());
    }
}
