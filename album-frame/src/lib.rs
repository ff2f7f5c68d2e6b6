//! Renders an album description into an e-paper frame buffer.

pub mod album;
pub mod config;

use std::path::{Path, PathBuf};

use album_render::{FontSet, Layout, LayoutConfig, Palette, render};
use anyhow::Context;
use tracing::info;

pub use config::AppConfig;

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub bytes: usize,
    pub preview: Option<PathBuf>,
}

/// Load the palette from `path`, or the built-in Inky Impression palette.
pub fn load_palette(path: Option<&Path>) -> Result<Palette, anyhow::Error> {
    let Some(path) = path else {
        return Ok(Palette::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read palette {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid palette {}", path.display()))
}

/// Build the layout described by `config`: layout file (or the built-in
/// layout), pixel format override, and font overrides.
pub fn load_layout(config: &AppConfig) -> Result<Layout, anyhow::Error> {
    let mut layout_config = match &config.layout {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read layout {}", path.display()))?;
            serde_json::from_str::<LayoutConfig>(&json)
                .with_context(|| format!("Invalid layout {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    if let Some(format) = config.pixel_format {
        layout_config.pixel_format = format;
    }

    let mut layout = Layout::new(layout_config)?;
    if config.font_regular.is_some() || config.font_bold.is_some() {
        layout = layout.with_fonts(load_fonts(config)?);
    }
    Ok(layout)
}

/// Custom faces; a missing one falls back to the embedded face of the same
/// weight.
fn load_fonts(config: &AppConfig) -> Result<FontSet, anyhow::Error> {
    let read = |path: &Option<PathBuf>, fallback: &[u8]| -> Result<Vec<u8>, anyhow::Error> {
        match path {
            Some(p) => {
                std::fs::read(p).with_context(|| format!("Failed to read font {}", p.display()))
            }
            None => Ok(fallback.to_vec()),
        }
    };
    let regular = read(&config.font_regular, album_render::fonts::DEJAVU_SANS)?;
    let bold = read(&config.font_bold, album_render::fonts::DEJAVU_SANS_BOLD)?;
    Ok(FontSet::from_bytes(regular, bold)?)
}

/// Render `album_path` and write the encoded frame (and preview, if
/// configured).
///
/// Palette and layout are loaded and cross-checked before the album is
/// read, so configuration mistakes fail before any rendering work.
pub fn run(
    album_path: &Path,
    cover: Option<&Path>,
    config: &AppConfig,
) -> Result<RunSummary, anyhow::Error> {
    let palette = load_palette(config.palette.as_deref())?;
    let layout = load_layout(config)?;
    layout.check_palette(&palette)?;
    info!(
        width = layout.width(),
        height = layout.height(),
        format = %layout.pixel_format(),
        "Configuration loaded"
    );

    let content = album::load_album(album_path, cover)?;
    let frame = render(&content, &palette, &layout)?;
    let encoded = frame.encode(layout.pixel_format(), &palette)?;

    std::fs::write(&config.output, &encoded)
        .with_context(|| format!("Failed to write frame {}", config.output.display()))?;
    info!("Wrote {} bytes to {}", encoded.len(), config.output.display());

    if let Some(preview_path) = &config.preview {
        frame
            .preview(&palette)?
            .save(preview_path)
            .with_context(|| format!("Failed to write preview {}", preview_path.display()))?;
        info!("Wrote preview to {}", preview_path.display());
    }

    Ok(RunSummary {
        output: config.output.clone(),
        bytes: encoded.len(),
        preview: config.preview.clone(),
    })
}
