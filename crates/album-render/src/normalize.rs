//! Cover image normalization.
//!
//! Decodes a source photo and fits it to an exact target box: scale
//! uniformly until the box is covered, then crop the overflowing axis
//! around the center. Never letterboxes, never distorts.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use tracing::debug;

use crate::{RenderError, Result};

/// Resampling filter used before cropping.
///
/// Lanczos3 widens its kernel with the downscale factor, which averages
/// over the source area and keeps aliasing out of the dither stage.
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Where and how large a source image lands before the centered crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Compute the cover-fit scale and centered crop for a source of
/// `src_w` x `src_h` into a `target_w` x `target_h` box.
pub fn plan_cover_crop(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> CropPlan {
    let scale_x = f64::from(target_w) / f64::from(src_w);
    let scale_y = f64::from(target_h) / f64::from(src_h);
    let scale = scale_x.max(scale_y);

    let scaled_width = ((f64::from(src_w) * scale).round() as u32).max(target_w);
    let scaled_height = ((f64::from(src_h) * scale).round() as u32).max(target_h);

    CropPlan {
        scaled_width,
        scaled_height,
        offset_x: (scaled_width - target_w) / 2,
        offset_y: (scaled_height - target_h) / 2,
    }
}

/// Decode raw image bytes in any format the `image` crate recognizes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).map_err(|e| RenderError::Decode(e.to_string()))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(RenderError::Decode("image has no pixels".into()));
    }
    Ok(img)
}

/// Fit an image to exactly `width` x `height` (scale to cover, center crop).
pub fn cover_fit(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
    let (orig_w, orig_h) = (img.width(), img.height());
    let plan = plan_cover_crop(orig_w, orig_h, width, height);

    debug!(
        orig_w,
        orig_h,
        scaled_w = plan.scaled_width,
        scaled_h = plan.scaled_height,
        crop_x = plan.offset_x,
        crop_y = plan.offset_y,
        "Fitting cover image"
    );

    let scaled = if (orig_w, orig_h) == (plan.scaled_width, plan.scaled_height) {
        img.to_rgb8()
    } else {
        img.resize_exact(plan.scaled_width, plan.scaled_height, RESAMPLE_FILTER)
            .to_rgb8()
    };

    imageops::crop_imm(&scaled, plan.offset_x, plan.offset_y, width, height).to_image()
}

/// Decode `bytes` and fit the result to `width` x `height`.
pub fn normalize_cover(bytes: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    let img = decode_image(bytes)?;
    Ok(cover_fit(&img, width, height))
}
