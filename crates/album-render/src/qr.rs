//! QR code generation for the album link.

use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::{RenderError, Result};

/// Error-correction level: medium (~15% recovery) holds up on small prints.
pub const EC_LEVEL: EcLevel = EcLevel::M;

/// Light modules kept around the symbol on each side.
pub const QUIET_ZONE_MODULES: u32 = 1;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Generate a QR code image for `data`, exactly `size` x `size` pixels.
///
/// Modules (plus the quiet zone) are mapped nearest-neighbor onto the
/// output, so every output pixel is either 0 (dark) or 255 (light).
pub fn generate_qr(data: &str, size: u32) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EC_LEVEL)
        .map_err(|e| RenderError::Code(format!("QR encode error: {e}")))?;
    let module_count = code.width() as u32;
    let total = module_count + QUIET_ZONE_MODULES * 2;

    if size < total {
        return Err(RenderError::Code(format!(
            "{size}px is too small for a {total}-module QR code"
        )));
    }

    debug!(module_count, size, "Rendering QR code");

    let modules = code.to_colors();
    let img = GrayImage::from_fn(size, size, |px, py| {
        let mx = px * total / size;
        let my = py * total / size;
        let inside = |m: u32| (QUIET_ZONE_MODULES..QUIET_ZONE_MODULES + module_count).contains(&m);
        if !inside(mx) || !inside(my) {
            return LIGHT;
        }
        let i = ((my - QUIET_ZONE_MODULES) * module_count + (mx - QUIET_ZONE_MODULES)) as usize;
        if modules[i] == Color::Dark { DARK } else { LIGHT }
    });

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_qr_has_exact_size() {
        let img = generate_qr("https://open.spotify.com/album/x", 100).unwrap();
        assert_eq!(img.dimensions(), (100, 100));
    }

    #[test]
    fn generate_qr_is_two_tone() {
        let img = generate_qr("https://example.com", 77).unwrap();
        assert!(img.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert!(img.pixels().any(|p| p[0] == 0));
        // Quiet zone corner is light.
        assert_eq!(img.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn generate_qr_is_deterministic() {
        let a = generate_qr("https://open.spotify.com/album/x", 100).unwrap();
        let b = generate_qr("https://open.spotify.com/album/x", 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn generate_qr_differs_per_url() {
        let a = generate_qr("https://open.spotify.com/album/x", 100).unwrap();
        let b = generate_qr("https://open.spotify.com/album/y", 100).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn generate_qr_rejects_tiny_size() {
        let err = generate_qr("https://example.com", 10).unwrap_err();
        assert!(matches!(err, RenderError::Code(_)));
    }

    #[test]
    fn generate_qr_rejects_oversized_data() {
        let data = "x".repeat(5000);
        assert!(matches!(generate_qr(&data, 400), Err(RenderError::Code(_))));
    }
}
