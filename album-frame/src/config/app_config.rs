//! Runtime configuration: defaults overridden by environment and flags.

use std::path::PathBuf;

use album_render::PixelFormat;
use anyhow::anyhow;

use super::validation::validate_setting;
use super::{
    KEY_FONT_BOLD, KEY_FONT_REGULAR, KEY_LAYOUT, KEY_OUTPUT, KEY_PALETTE, KEY_PIXEL_FORMAT,
    KEY_PREVIEW, SETTING_KEYS,
};

pub const DEFAULT_OUTPUT: &str = "album_frame.bin";

/// Where inputs come from and where results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub output: PathBuf,
    pub preview: Option<PathBuf>,
    pub layout: Option<PathBuf>,
    pub palette: Option<PathBuf>,
    /// Overrides the layout's own pixel format when set.
    pub pixel_format: Option<PixelFormat>,
    pub font_regular: Option<PathBuf>,
    pub font_bold: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            preview: None,
            layout: None,
            palette: None,
            pixel_format: None,
            font_regular: None,
            font_bold: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key-value source, starting from defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let mut config = Self::default();
        for key in SETTING_KEYS {
            if let Some(value) = lookup(key) {
                config.set(key, &value)?;
            }
        }
        Ok(config)
    }

    /// Validate and apply a single setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        validate_setting(key, value).map_err(|e| anyhow!("{key}: {e}"))?;

        let path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));
        match key {
            KEY_OUTPUT => self.output = PathBuf::from(value),
            KEY_PREVIEW => self.preview = path(value),
            KEY_LAYOUT => self.layout = path(value),
            KEY_PALETTE => self.palette = path(value),
            KEY_PIXEL_FORMAT => {
                self.pixel_format = Some(value.parse().map_err(|e: String| anyhow!("{key}: {e}"))?)
            }
            KEY_FONT_REGULAR => self.font_regular = path(value),
            KEY_FONT_BOLD => self.font_bold = path(value),
            _ => return Err(anyhow!("unknown setting '{key}'")),
        }
        Ok(())
    }
}
