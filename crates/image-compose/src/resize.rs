//! Resizing helpers used to fit an overlay into a target rectangle.
//!
//! Upscaling keeps the aspect ratio by using a single integer factor for
//! both axes; the final fit crops to the target ratio before resizing.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::geometry;

/// How an undersized source is enlarged before the aspect crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpscaleStrategy {
    /// One resize by the smallest integer factor that covers the target.
    #[default]
    Direct,
    /// Repeated ×2 resizes until the target is covered. Overshoots to the
    /// next power of two.
    Doubling,
}

/// Enlarge `img` until it is at least `width × height` on both axes.
///
/// Never shrinks. Returns a clone when the image already covers the target
/// or has a zero dimension.
pub fn upscale_to_cover(
    img: &DynamicImage,
    width: u32,
    height: u32,
    strategy: UpscaleStrategy,
    filter: FilterType,
) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w == 0 || orig_h == 0 || (orig_w >= width && orig_h >= height) {
        return img.clone();
    }

    match strategy {
        UpscaleStrategy::Direct => {
            let factor = width.div_ceil(orig_w).max(height.div_ceil(orig_h));
            debug!(orig_w, orig_h, factor, "Upscaling image to cover target");
            img.resize_exact(orig_w * factor, orig_h * factor, filter)
        }
        UpscaleStrategy::Doubling => {
            let mut current = img.clone();
            while current.width() < width || current.height() < height {
                current = current.resize_exact(current.width() * 2, current.height() * 2, filter);
            }
            debug!(
                orig_w,
                orig_h,
                new_width = current.width(),
                new_height = current.height(),
                "Upscaled image by doubling"
            );
            current
        }
    }
}

/// Scale and center-crop `img` so it exactly fills `width × height`.
///
/// Both target dimensions must be non-zero.
pub fn fit_to_size(
    img: &DynamicImage,
    width: u32,
    height: u32,
    strategy: UpscaleStrategy,
    filter: FilterType,
) -> DynamicImage {
    let covered = upscale_to_cover(img, width, height, strategy, filter);

    let cropped = match geometry::aspect_crop(covered.width(), covered.height(), width, height) {
        Some(crop) => {
            debug!(
                x = crop.x,
                y = crop.y,
                crop_width = crop.width,
                crop_height = crop.height,
                "Cropping to target aspect ratio"
            );
            covered.crop_imm(crop.x, crop.y, crop.width, crop.height)
        }
        None => covered,
    };

    if cropped.width() == width && cropped.height() == height {
        return cropped;
    }

    debug!(
        orig_w = cropped.width(),
        orig_h = cropped.height(),
        new_width = width,
        new_height = height,
        "Resizing to target size"
    );
    cropped.resize_exact(width, height, filter)
}
