//! Font faces used for text regions.
//!
//! DejaVu Sans (regular and bold) ships inside the crate so rendering does
//! not depend on system fonts; callers may swap in their own TTF/OTF data.

use std::fmt;
use std::sync::LazyLock;

use ab_glyph::FontArc;
use serde::{Deserialize, Serialize};

use crate::{RenderError, Result};

/// Raw TTF data of the bundled faces.
pub static DEJAVU_SANS: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
pub static DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

static EMBEDDED: LazyLock<FontSet> = LazyLock::new(|| FontSet {
    regular: FontArc::try_from_slice(DEJAVU_SANS).expect("embedded DejaVu Sans is a valid font"),
    bold: FontArc::try_from_slice(DEJAVU_SANS_BOLD)
        .expect("embedded DejaVu Sans Bold is a valid font"),
});

/// Font weight selectable per text region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// A regular and a bold face.
#[derive(Clone)]
pub struct FontSet {
    regular: FontArc,
    bold: FontArc,
}

impl FontSet {
    /// The bundled DejaVu Sans faces.
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Parse custom regular and bold faces from raw TTF/OTF data.
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> Result<Self> {
        let parse = |data: Vec<u8>, which: &str| {
            FontArc::try_from_vec(data)
                .map_err(|e| RenderError::Font(format!("invalid {which} font: {e}")))
        };
        Ok(Self {
            regular: parse(regular, "regular")?,
            bold: parse(bold, "bold")?,
        })
    }

    pub fn get(&self, weight: FontWeight) -> &FontArc {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self::embedded()
    }
}

impl fmt::Debug for FontSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSet").finish_non_exhaustive()
    }
}
