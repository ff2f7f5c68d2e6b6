//! Configuration: defaults, `.env` files, environment variables, validation.

pub mod app_config;
pub mod validation;

pub use app_config::AppConfig;
pub use validation::validate_setting;

/// Encoded frame output path.
pub const KEY_OUTPUT: &str = "ALBUM_FRAME_OUTPUT";
/// PNG preview path; empty disables the preview.
pub const KEY_PREVIEW: &str = "ALBUM_FRAME_PREVIEW";
/// Layout JSON path; empty uses the built-in layout.
pub const KEY_LAYOUT: &str = "ALBUM_FRAME_LAYOUT";
/// Palette JSON path; empty uses the built-in palette.
pub const KEY_PALETTE: &str = "ALBUM_FRAME_PALETTE";
pub const KEY_PIXEL_FORMAT: &str = "ALBUM_FRAME_PIXEL_FORMAT";
pub const KEY_FONT_REGULAR: &str = "ALBUM_FRAME_FONT_REGULAR";
pub const KEY_FONT_BOLD: &str = "ALBUM_FRAME_FONT_BOLD";

/// Every setting read from the environment.
pub const SETTING_KEYS: &[&str] = &[
    KEY_OUTPUT,
    KEY_PREVIEW,
    KEY_LAYOUT,
    KEY_PALETTE,
    KEY_PIXEL_FORMAT,
    KEY_FONT_REGULAR,
    KEY_FONT_BOLD,
];

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
