//! Setting value validation.

use std::path::Path;

use super::{
    KEY_FONT_BOLD, KEY_FONT_REGULAR, KEY_LAYOUT, KEY_OUTPUT, KEY_PALETTE, KEY_PIXEL_FORMAT,
    KEY_PREVIEW,
};

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        KEY_OUTPUT => {
            if value.is_empty() {
                return Err("must not be empty".into());
            }
            if value.ends_with('/') || value.ends_with(std::path::MAIN_SEPARATOR) {
                return Err("must be a file path, not a directory".into());
            }
        }
        KEY_PREVIEW => validate_extension(value, &["png"])?,
        KEY_LAYOUT | KEY_PALETTE => validate_extension(value, &["json"])?,
        KEY_FONT_REGULAR | KEY_FONT_BOLD => validate_extension(value, &["ttf", "otf"])?,
        KEY_PIXEL_FORMAT => {
            if value != "packed4" && value != "byte" {
                return Err("must be 'packed4' or 'byte'".into());
            }
        }
        _ => return Err(format!("unknown setting '{key}'")),
    }
    Ok(())
}

/// Empty values are allowed (feature disabled / built-in default).
fn validate_extension(value: &str, allowed: &[&str]) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    let ext = Path::new(value)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !allowed.contains(&ext.as_str()) {
        return Err(format!("expected a .{} file", allowed.join(" or .")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pixel_format() {
        assert!(validate_setting(KEY_PIXEL_FORMAT, "packed4").is_ok());
        assert!(validate_setting(KEY_PIXEL_FORMAT, "byte").is_ok());
        assert!(validate_setting(KEY_PIXEL_FORMAT, "rgb").is_err());
        assert!(validate_setting(KEY_PIXEL_FORMAT, "").is_err());
    }

    #[test]
    fn test_valid_output() {
        assert!(validate_setting(KEY_OUTPUT, "album_frame.bin").is_ok());
        assert!(validate_setting(KEY_OUTPUT, "/tmp/frames/").is_err());
        assert!(validate_setting(KEY_OUTPUT, "").is_err());
    }

    #[test]
    fn test_valid_paths_by_extension() {
        assert!(validate_setting(KEY_PREVIEW, "").is_ok()); // empty disables
        assert!(validate_setting(KEY_PREVIEW, "preview.PNG").is_ok());
        assert!(validate_setting(KEY_PREVIEW, "preview.jpg").is_err());
        assert!(validate_setting(KEY_LAYOUT, "layout.json").is_ok());
        assert!(validate_setting(KEY_PALETTE, "palette.toml").is_err());
        assert!(validate_setting(KEY_FONT_BOLD, "Inter-Bold.otf").is_ok());
        assert!(validate_setting(KEY_FONT_REGULAR, "Inter").is_err());
    }

    #[test]
    fn test_unknown_key() {
        assert!(validate_setting("ALBUM_FRAME_COLOR", "red").is_err());
    }
}
