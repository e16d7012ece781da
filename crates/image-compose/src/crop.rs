//! Square cropping.

use image::DynamicImage;
use tracing::debug;

use crate::geometry;

/// Crop the middle part of an image into a square.
///
/// The side is `min(width, height)`; the longer axis loses equal margins
/// (an odd difference leaves the extra pixel on the right/bottom). Square
/// inputs come back as a full-bounds copy.
pub fn crop_into_square(img: &DynamicImage) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let crop = geometry::square_crop(w, h);
    debug!(w, h, x = crop.x, y = crop.y, side = crop.width, "Cropping image into square");
    img.crop_imm(crop.x, crop.y, crop.width, crop.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayImage, Luma, Pixel};

    /// Gray image where each pixel stores its x coordinate.
    fn create_column_image(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| Luma([x as u8]));
        DynamicImage::ImageLuma8(img)
    }

    fn pixel_value(img: &DynamicImage, x: u32, y: u32) -> u8 {
        img.to_luma8().get_pixel(x, y).channels()[0]
    }

    #[test]
    fn test_landscape_crops_left_and_right() {
        let img = create_column_image(100, 60);
        let result = crop_into_square(&img);
        assert_eq!(result.dimensions(), (60, 60));
        assert_eq!(pixel_value(&result, 0, 0), 20);
        assert_eq!(pixel_value(&result, 59, 59), 79);
    }

    #[test]
    fn test_portrait_crops_top_and_bottom() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(40, 100, |_, y| Luma([y as u8])));
        let result = crop_into_square(&img);
        assert_eq!(result.dimensions(), (40, 40));
        assert_eq!(pixel_value(&result, 0, 0), 30);
    }

    #[test]
    fn test_odd_difference_still_square() {
        let img = create_column_image(5, 2);
        let result = crop_into_square(&img);
        assert_eq!(result.dimensions(), (2, 2));
        assert_eq!(pixel_value(&result, 0, 0), 1);
    }

    #[test]
    fn test_square_input_unchanged() {
        let img = create_column_image(32, 32);
        let result = crop_into_square(&img);
        assert_eq!(result.dimensions(), (32, 32));
        assert_eq!(pixel_value(&result, 7, 3), 7);
    }

    #[test]
    fn test_crop_is_idempotent() {
        let img = create_column_image(91, 50);
        let once = crop_into_square(&img);
        let twice = crop_into_square(&once);
        assert_eq!(once.dimensions(), twice.dimensions());
        assert_eq!(once.to_luma8().as_raw(), twice.to_luma8().as_raw());
    }
}
