//! The fixed color set of a 7-color e-paper panel.
//!
//! Index order follows the Inky Impression driver's color codes so that a
//! quantized index can be sent to the panel unchanged.

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::{RenderError, Result};

/// Number of colors a panel palette must hold.
pub const PALETTE_SIZE: usize = 7;

pub const BLACK: u8 = 0;
pub const WHITE: u8 = 1;
pub const GREEN: u8 = 2;
pub const BLUE: u8 = 3;
pub const RED: u8 = 4;
pub const YELLOW: u8 = 5;
pub const ORANGE: u8 = 6;

const BLACK_RGB: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE_RGB: Rgb<u8> = Rgb([255, 255, 255]);

/// Reference colors of the Inky Impression 7-color panel.
const INKY_IMPRESSION: [[u8; 3]; PALETTE_SIZE] = [
    [0, 0, 0],       // black
    [255, 255, 255], // white
    [58, 91, 70],    // green
    [29, 53, 87],    // blue
    [255, 0, 0],     // red
    [208, 190, 71],  // yellow
    [177, 106, 73],  // orange
];

/// A validated, immutable panel palette.
///
/// Holds exactly [`PALETTE_SIZE`] distinct colors including pure black and
/// pure white.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[u8; 3]>", into = "Vec<[u8; 3]>")]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

impl Palette {
    /// Build a palette, rejecting wrong sizes, duplicates, and palettes
    /// lacking black or white.
    pub fn new(colors: Vec<Rgb<u8>>) -> Result<Self> {
        if colors.len() != PALETTE_SIZE {
            return Err(RenderError::Palette(format!(
                "expected {PALETTE_SIZE} colors, got {}",
                colors.len()
            )));
        }

        for (i, a) in colors.iter().enumerate() {
            if let Some(j) = colors[i + 1..].iter().position(|b| b == a) {
                return Err(RenderError::Palette(format!(
                    "colors {i} and {} are both {:?}",
                    i + 1 + j,
                    a.0
                )));
            }
        }

        if !colors.contains(&BLACK_RGB) {
            return Err(RenderError::Palette("palette must include black (0,0,0)".into()));
        }
        if !colors.contains(&WHITE_RGB) {
            return Err(RenderError::Palette(
                "palette must include white (255,255,255)".into(),
            ));
        }

        Ok(Self { colors })
    }

    /// The native palette of the Inky Impression 7.3" panel.
    pub fn inky_impression() -> Self {
        Self {
            colors: INKY_IMPRESSION.iter().map(|&c| Rgb(c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    /// Color at `index`, if it exists.
    pub fn get(&self, index: u8) -> Option<Rgb<u8>> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Index of an exact color match.
    pub fn index_of(&self, color: Rgb<u8>) -> Option<u8> {
        self.colors.iter().position(|&c| c == color).map(|i| i as u8)
    }

    /// Index of the entry closest to `color` by Euclidean RGB distance.
    ///
    /// Ties resolve to the lowest index.
    pub fn nearest(&self, color: [f32; 3]) -> u8 {
        let mut best = 0u8;
        let mut best_dist = f32::INFINITY;
        for (i, c) in self.colors.iter().enumerate() {
            let dr = color[0] - f32::from(c[0]);
            let dg = color[1] - f32::from(c[1]);
            let db = color[2] - f32::from(c[2]);
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = i as u8;
            }
        }
        best
    }

    /// Entry with the highest contrast ratio against `background`, together
    /// with that ratio. Ties resolve to the lowest index.
    pub fn best_contrast(&self, background: Rgb<u8>) -> (u8, f32) {
        let mut best = (0u8, 0.0f32);
        for (i, &c) in self.colors.iter().enumerate() {
            let ratio = contrast_ratio(c, background);
            if ratio > best.1 {
                best = (i as u8, ratio);
            }
        }
        best
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::inky_impression()
    }
}

impl TryFrom<Vec<[u8; 3]>> for Palette {
    type Error = RenderError;

    fn try_from(colors: Vec<[u8; 3]>) -> Result<Self> {
        Self::new(colors.into_iter().map(Rgb).collect())
    }
}

impl From<Palette> for Vec<[u8; 3]> {
    fn from(palette: Palette) -> Self {
        palette.colors.into_iter().map(|c| c.0).collect()
    }
}

/// WCAG relative luminance of an sRGB color.
pub fn relative_luminance(color: Rgb<u8>) -> f32 {
    fn channel(v: u8) -> f32 {
        let c = f32::from(v) / 255.0;
        if c <= 0.039_28 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * channel(color[0]) + 0.7152 * channel(color[1]) + 0.0722 * channel(color[2])
}

/// WCAG contrast ratio between two colors, in `1.0..=21.0`.
pub fn contrast_ratio(a: Rgb<u8>, b: Rgb<u8>) -> f32 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> Rgb<u8> {
        Rgb([r, g, b])
    }

    #[test]
    fn test_default_palette_is_valid() {
        let palette = Palette::inky_impression();
        let rebuilt = Palette::new(palette.colors().to_vec()).unwrap();
        assert_eq!(rebuilt, palette);
        assert_eq!(palette.len(), PALETTE_SIZE);
        assert_eq!(palette.get(BLACK), Some(rgb(0, 0, 0)));
        assert_eq!(palette.get(WHITE), Some(rgb(255, 255, 255)));
        assert_eq!(palette.get(RED), Some(rgb(255, 0, 0)));
        assert_eq!(palette.get(BLUE), Some(rgb(29, 53, 87)));
        assert_eq!(palette.get(7), None);
    }

    #[test]
    fn test_rejects_wrong_size() {
        let mut colors = Palette::inky_impression().colors().to_vec();
        colors.pop();
        assert!(matches!(Palette::new(colors), Err(RenderError::Palette(_))));
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut colors = Palette::inky_impression().colors().to_vec();
        colors[ORANGE as usize] = colors[RED as usize];
        let err = Palette::new(colors).unwrap_err();
        assert!(err.to_string().contains("colors 4 and 6"));
    }

    #[test]
    fn test_requires_black_and_white() {
        let mut colors = Palette::inky_impression().colors().to_vec();
        colors[BLACK as usize] = rgb(1, 1, 1);
        assert!(Palette::new(colors).is_err());

        let mut colors = Palette::inky_impression().colors().to_vec();
        colors[WHITE as usize] = rgb(250, 250, 250);
        assert!(Palette::new(colors).is_err());
    }

    #[test]
    fn test_nearest_exact_match() {
        let palette = Palette::inky_impression();
        for (i, c) in palette.colors().iter().enumerate() {
            let px = [f32::from(c[0]), f32::from(c[1]), f32::from(c[2])];
            assert_eq!(palette.nearest(px), i as u8);
        }
    }

    #[test]
    fn test_nearest_ties_pick_lowest_index() {
        let palette = Palette::new(vec![
            rgb(0, 0, 0),
            rgb(255, 255, 255),
            rgb(10, 0, 0),
            rgb(0, 10, 0),
            rgb(0, 0, 200),
            rgb(200, 200, 0),
            rgb(200, 0, 200),
        ])
        .unwrap();
        // Equidistant (100) from entries 2 and 3.
        assert_eq!(palette.nearest([10.0, 10.0, 0.0]), 2);
    }

    #[test]
    fn test_nearest_accepts_out_of_range_values() {
        let palette = Palette::inky_impression();
        assert_eq!(palette.nearest([-40.0, -40.0, -40.0]), BLACK);
        assert_eq!(palette.nearest([300.0, 300.0, 300.0]), WHITE);
    }

    #[test]
    fn test_contrast_ratio_extremes() {
        let ratio = contrast_ratio(rgb(0, 0, 0), rgb(255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.01);
        let same = contrast_ratio(rgb(9, 9, 9), rgb(9, 9, 9));
        assert!((same - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_best_contrast_against_known_backgrounds() {
        let palette = Palette::inky_impression();
        assert_eq!(palette.best_contrast(rgb(0, 0, 0)).0, WHITE);
        assert_eq!(palette.best_contrast(rgb(255, 255, 255)).0, BLACK);
        assert_eq!(palette.best_contrast(rgb(29, 53, 87)).0, WHITE);
        // Pure red is darker than mid-gray in luminance terms.
        assert_eq!(palette.best_contrast(rgb(255, 0, 0)).0, BLACK);
    }

    #[test]
    fn test_palette_serde_round_trip() {
        let json = serde_json::to_string(&Palette::inky_impression()).unwrap();
        assert!(json.starts_with("[[0,0,0],[255,255,255]"));
        let parsed: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Palette::inky_impression());

        let too_short = "[[0,0,0],[255,255,255]]";
        assert!(serde_json::from_str::<Palette>(too_short).is_err());
    }
}
