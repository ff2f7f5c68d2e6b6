//! # album-frame
//!
//! Renders an album description into a frame buffer for a 7-color e-paper
//! panel.
//!
//! ```bash
//! album-frame album.json --output frame.bin --preview frame.png
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use album_frame::AppConfig;
use album_frame::config::{self, KEY_LAYOUT, KEY_OUTPUT, KEY_PALETTE, KEY_PIXEL_FORMAT, KEY_PREVIEW};

/// Album of the day for 7-color e-paper panels
#[derive(Parser, Debug)]
#[command(name = "album-frame")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Album description (JSON)
    album: PathBuf,

    /// Cover image, overriding the album file's cover_path
    #[arg(long, value_name = "FILE")]
    cover: Option<PathBuf>,

    /// Encoded frame output [env: ALBUM_FRAME_OUTPUT]
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write the quantized frame as PNG [env: ALBUM_FRAME_PREVIEW]
    #[arg(long, value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Layout JSON [env: ALBUM_FRAME_LAYOUT]
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Palette JSON, 7 [r, g, b] triples [env: ALBUM_FRAME_PALETTE]
    #[arg(long, value_name = "FILE")]
    palette: Option<PathBuf>,

    /// Pixel format: packed4 or byte [env: ALBUM_FRAME_PIXEL_FORMAT]
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,
}

impl Cli {
    /// Flags take precedence over environment settings.
    fn apply(&self, config: &mut AppConfig) -> anyhow::Result<()> {
        let paths = [
            (KEY_OUTPUT, &self.output),
            (KEY_PREVIEW, &self.preview),
            (KEY_LAYOUT, &self.layout),
            (KEY_PALETTE, &self.palette),
        ];
        for (key, value) in paths {
            if let Some(path) = value {
                config.set(key, &path.to_string_lossy())?;
            }
        }
        if let Some(format) = &self.format {
            config.set(KEY_PIXEL_FORMAT, format)?;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    config::load_dotenv();
    let mut app_config = AppConfig::from_env()?;
    cli.apply(&mut app_config)?;

    let summary = album_frame::run(&cli.album, cli.cover.as_deref(), &app_config)?;
    tracing::info!("Done: {} ({} bytes)", summary.output.display(), summary.bytes);
    Ok(())
}
