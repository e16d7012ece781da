//! Image composition: alpha compositing and fitted inserts.

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::Rect;
use crate::mask;
use crate::resize::{self, UpscaleStrategy};

/// Options for [`insert_image`] and [`insert_circle_image`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Rounded corner radius in pixels; 0 keeps square corners.
    pub corner_radius: u32,
    pub filter: FilterType,
    pub upscale: UpscaleStrategy,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            corner_radius: 0,
            filter: FilterType::Lanczos3,
            upscale: UpscaleStrategy::Direct,
        }
    }
}

impl FitOptions {
    pub fn with_corner_radius(mut self, radius: u32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_upscale(mut self, upscale: UpscaleStrategy) -> Self {
        self.upscale = upscale;
        self
    }
}

/// Alpha-composite `top` over `base` with its top-left corner at `(x, y)`.
///
/// Uses the Porter-Duff "over" operator on straight alpha. Pixels falling
/// outside `base` are clipped; negative offsets are allowed.
pub fn alpha_composite(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (base_w, base_h) = (i64::from(base.width()), i64::from(base.height()));
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + i64::from(dx);
        let target_y = y + i64::from(dy);
        if target_x < 0 || target_y < 0 || target_x >= base_w || target_y >= base_h {
            continue;
        }
        let (target_x, target_y) = (target_x as u32, target_y as u32);
        match pixel[3] {
            0 => {}
            255 => base.put_pixel(target_x, target_y, *pixel),
            _ => {
                let bg = base.get_pixel(target_x, target_y);
                let blended = blend_over(bg, pixel);
                base.put_pixel(target_x, target_y, blended);
            }
        }
    }
}

/// Scale and crop `overlay` to exactly fill `bbox`, then composite it onto a
/// copy of `base`.
///
/// `bbox` is `(left, top, right, bottom)` and must have exactly 4 components,
/// otherwise [`ComposeError::InvalidBox`](crate::ComposeError::InvalidBox) is
/// returned before any pixel work. An empty or inverted box, or an empty
/// overlay, yields an unchanged copy of `base`.
///
/// Neither `base` nor `overlay` is modified.
pub fn insert_image<B>(
    base: &RgbaImage,
    overlay: &DynamicImage,
    bbox: B,
    options: &FitOptions,
) -> Result<RgbaImage>
where
    B: AsRef<[i32]>,
{
    let rect = Rect::from_slice(bbox.as_ref())?;
    let mut out = base.clone();

    let Some((w, h)) = rect.extent() else {
        warn!(?rect, "Target box has no area, skipping insert");
        return Ok(out);
    };
    if overlay.width() == 0 || overlay.height() == 0 {
        warn!("Overlay image is empty, skipping insert");
        return Ok(out);
    }

    let fitted = resize::fit_to_size(overlay, w, h, options.upscale, options.filter);
    let mut fitted = fitted.to_rgba8();
    mask::add_border_radius(&mut fitted, options.corner_radius);

    debug!(
        left = rect.left,
        top = rect.top,
        w,
        h,
        corner_radius = options.corner_radius,
        "Compositing fitted overlay"
    );
    alpha_composite(
        &mut out,
        &fitted,
        i64::from(rect.left),
        i64::from(rect.top),
    );
    Ok(out)
}

/// Like [`insert_image`], but the overlay is first masked to the ellipse
/// inscribed in its own bounds.
///
/// A non-square overlay is masked to an ellipse, not a circle. The corner
/// radius in `options` is ignored.
pub fn insert_circle_image<B>(
    base: &RgbaImage,
    overlay: &DynamicImage,
    bbox: B,
    options: &FitOptions,
) -> Result<RgbaImage>
where
    B: AsRef<[i32]>,
{
    let rect = Rect::from_slice(bbox.as_ref())?;

    let src = overlay.to_rgba8();
    let ellipse = mask::ellipse_mask(src.width(), src.height());
    let masked = DynamicImage::ImageRgba8(mask::apply_mask(&src, &ellipse));

    let options = options.with_corner_radius(0);
    insert_image(base, &masked, rect.to_array(), &options)
}

fn blend_over(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let src_a = f32::from(fg[3]) / 255.0;
    let dst_a = f32::from(bg[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (f32::from(fg[i]) * src_a + f32::from(bg[i]) * dst_a * (1.0 - src_a)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}
