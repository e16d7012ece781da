//! Alpha masks: rounded corners and inscribed ellipses.

use image::imageops;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_ellipse_mut;
use tracing::debug;

const OPAQUE: Luma<u8> = Luma([255]);

/// Single-channel mask of the given size with a filled ellipse inscribed in
/// its full bounding box. Non-square sizes give an ellipse, not a circle.
pub fn ellipse_mask(width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return mask;
    }
    let (rx, ry) = ((width / 2) as i32, (height / 2) as i32);
    draw_filled_ellipse_mut(&mut mask, (rx, ry), rx, ry, OPAQUE);
    mask
}

/// Paste `src` through `mask` onto a fully transparent canvas of the same size.
///
/// Every channel, alpha included, is scaled by the mask value, so mask 0
/// yields a transparent pixel and mask 255 copies the source pixel.
pub fn apply_mask(src: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    let mut out = RgbaImage::new(src.width(), src.height());
    for (x, y, pixel) in src.enumerate_pixels() {
        if x >= mask.width() || y >= mask.height() {
            continue;
        }
        let m = u16::from(mask.get_pixel(x, y)[0]);
        if m == 0 {
            continue;
        }
        let scale = |c: u8| ((u16::from(c) * m + 127) / 255) as u8;
        out.put_pixel(
            x,
            y,
            Rgba([scale(pixel[0]), scale(pixel[1]), scale(pixel[2]), scale(pixel[3])]),
        );
    }
    out
}

/// Round the four corners of `img` by replacing its alpha channel.
///
/// A `(2r, 2r)` stencil holding an inscribed circle is split into quadrants,
/// which are copied onto the corners of an otherwise opaque alpha layer. The
/// existing alpha is overwritten, not multiplied.
///
/// `radius == 0` leaves the image untouched. When `2 * radius` exceeds the
/// smaller side the quadrants overlap and the result degrades, but nothing fails.
pub fn add_border_radius(img: &mut RgbaImage, radius: u32) {
    if radius == 0 {
        return;
    }

    let (w, h) = img.dimensions();
    if radius.saturating_mul(2) > w.min(h) {
        debug!(w, h, radius, "Corner radius exceeds half the image size");
    }

    let diameter = radius.saturating_mul(2);
    let mut circle = GrayImage::new(diameter, diameter);
    let r = radius as i32;
    draw_filled_ellipse_mut(&mut circle, (r, r), r, r, OPAQUE);

    let mut alpha = GrayImage::from_pixel(w, h, OPAQUE);
    let (w, h, radius) = (i64::from(w), i64::from(h), i64::from(radius));
    let quadrants = [
        ((0, 0), (0, 0)),
        ((radius, 0), (w - radius, 0)),
        ((radius, radius), (w - radius, h - radius)),
        ((0, radius), (0, h - radius)),
    ];
    for ((qx, qy), (dx, dy)) in quadrants {
        let quadrant =
            imageops::crop_imm(&circle, qx as u32, qy as u32, radius as u32, radius as u32)
                .to_image();
        imageops::replace(&mut alpha, &quadrant, dx, dy);
    }

    for (pixel, a) in img.pixels_mut().zip(alpha.pixels()) {
        pixel[3] = a[0];
    }
    debug!(radius, "Applied rounded corner mask");
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn alpha_at(img: &RgbaImage, x: u32, y: u32) -> u8 {
        img.get_pixel(x, y)[3]
    }

    #[test]
    fn test_rounded_corners_clear_the_corners() {
        let mut img = RgbaImage::from_pixel(40, 30, RED);
        add_border_radius(&mut img, 8);

        assert_eq!(alpha_at(&img, 0, 0), 0);
        assert_eq!(alpha_at(&img, 39, 0), 0);
        assert_eq!(alpha_at(&img, 0, 29), 0);
        assert_eq!(alpha_at(&img, 39, 29), 0);
        assert_eq!(alpha_at(&img, 20, 15), 255);
        assert_eq!(alpha_at(&img, 20, 0), 255);
        assert_eq!(alpha_at(&img, 0, 15), 255);
        // Colour channels are kept.
        assert_eq!(img.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_rounded_corners_replace_existing_alpha() {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 10]));
        add_border_radius(&mut img, 4);
        assert_eq!(alpha_at(&img, 10, 10), 255);
    }

    #[test]
    fn test_zero_radius_is_a_no_op() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 77]));
        let before = img.clone();
        add_border_radius(&mut img, 0);
        assert_eq!(img, before);
    }

    #[test]
    fn test_oversized_radius_does_not_panic() {
        let mut img = RgbaImage::from_pixel(10, 6, RED);
        add_border_radius(&mut img, 9);
        assert_eq!(img.dimensions(), (10, 6));
        assert_eq!(alpha_at(&img, 0, 0), 0);
    }

    #[test]
    fn test_ellipse_mask_inscribed_in_bounds() {
        let mask = ellipse_mask(60, 30);
        assert_eq!(mask.dimensions(), (60, 30));
        assert_eq!(mask.get_pixel(30, 15)[0], 255);
        assert_eq!(mask.get_pixel(1, 15)[0], 255);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(59, 29)[0], 0);
    }

    #[test]
    fn test_ellipse_mask_empty_size() {
        let mask = ellipse_mask(0, 10);
        assert_eq!(mask.dimensions(), (0, 10));
    }

    #[test]
    fn test_apply_mask_blends_toward_transparent() {
        let src = RgbaImage::from_pixel(3, 1, Rgba([200, 100, 50, 255]));
        let mut mask = GrayImage::new(3, 1);
        mask.put_pixel(1, 0, Luma([255]));
        mask.put_pixel(2, 0, Luma([128]));

        let out = apply_mask(&src, &mask);
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([200, 100, 50, 255]));
        assert_eq!(*out.get_pixel(2, 0), Rgba([100, 50, 25, 128]));
    }
}
