//! Utility functions for basic grayscale image operations.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use std::borrow::Cow;

/// Maps every intensity `v` to `255 - v`.
pub fn invert_gray(img: &mut GrayImage) {
    for pixel in img.pixels_mut() {
        pixel.0[0] = u8::MAX - pixel.0[0];
    }
}

/// Resizes a grayscale image to exact dimensions.
///
/// # Arguments
///
/// * `img` - The image to resize
/// * `width` - Target width
/// * `height` - Target height
/// * `filter` - Interpolation filter
pub fn resize_gray_image(img: &GrayImage, width: u32, height: u32, filter: FilterType) -> GrayImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, filter)
}

/// Shrinks an image so that neither side exceeds `max_side`, keeping its aspect ratio.
///
/// Images that already fit are borrowed unchanged. The shorter side is rounded to the
/// nearest integer and never drops below one pixel.
///
/// # Arguments
///
/// * `img` - The image to bound
/// * `max_side` - Largest allowed width or height, must be positive
/// * `filter` - Interpolation filter used when shrinking
pub fn downscale_to_fit(img: &GrayImage, max_side: u32, filter: FilterType) -> Cow<'_, GrayImage> {
    let (width, height) = img.dimensions();
    let longest = width.max(height);
    if longest <= max_side {
        return Cow::Borrowed(img);
    }

    let scale = |side: u32| {
        let scaled = (side as u64 * max_side as u64 + longest as u64 / 2) / longest as u64;
        (scaled as u32).clamp(1, max_side)
    };
    Cow::Owned(imageops::resize(img, scale(width), scale(height), filter))
}

/// Pads a grayscale image to a square, centered on a `fill` canvas.
///
/// The side is `max(width, height)`. The image is placed at
/// `((side - width) / 2, (side - height) / 2)` using integer division, so any odd
/// remainder goes to the right or bottom margin. Source pixels are copied unchanged.
///
/// # Arguments
///
/// * `img` - The image to pad
/// * `fill` - Intensity of the padding
///
/// # Returns
///
/// The square image and the `(x, y)` offset at which the source was placed.
pub fn pad_to_square(img: &GrayImage, fill: u8) -> (GrayImage, (u32, u32)) {
    let (src_width, src_height) = img.dimensions();
    let side = src_width.max(src_height);

    if src_width == src_height {
        return (img.clone(), (0, 0));
    }

    let mut padded = GrayImage::from_pixel(side, side, Luma([fill]));

    let x_offset = (side - src_width) / 2;
    let y_offset = (side - src_height) / 2;

    imageops::replace(&mut padded, img, x_offset as i64, y_offset as i64);

    (padded, (x_offset, y_offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_gray() {
        let mut img = GrayImage::from_raw(3, 1, vec![0, 100, 255]).unwrap();
        invert_gray(&mut img);
        assert_eq!(img.into_raw(), vec![255, 155, 0]);
    }

    #[test]
    fn test_pad_tall_image() {
        let img = GrayImage::from_pixel(10, 20, Luma([200]));
        let (padded, offset) = pad_to_square(&img, 0);

        assert_eq!(padded.dimensions(), (20, 20));
        assert_eq!(offset, (5, 0));
        assert_eq!(padded.get_pixel(4, 10), &Luma([0]));
        assert_eq!(padded.get_pixel(5, 10), &Luma([200]));
        assert_eq!(padded.get_pixel(14, 10), &Luma([200]));
        assert_eq!(padded.get_pixel(15, 10), &Luma([0]));
    }

    #[test]
    fn test_pad_odd_remainder_goes_right() {
        let img = GrayImage::from_pixel(4, 1, Luma([9]));
        let (padded, offset) = pad_to_square(&img, 0);

        assert_eq!(padded.dimensions(), (4, 4));
        assert_eq!(offset, (0, 1));
        let filled = padded.pixels().filter(|p| p.0[0] == 9).count();
        assert_eq!(filled, 4);
    }

    #[test]
    fn test_pad_square_is_identity() {
        let img = GrayImage::from_fn(6, 6, |x, y| Luma([(x * 10 + y) as u8]));
        let (padded, offset) = pad_to_square(&img, 0);
        assert_eq!(padded, img);
        assert_eq!(offset, (0, 0));
    }

    #[test]
    fn test_downscale_to_fit_borrows_small_images() {
        let img = GrayImage::from_pixel(1, 1000, Luma([255]));
        let bounded = downscale_to_fit(&img, 2048, FilterType::Lanczos3);
        assert!(matches!(bounded, Cow::Borrowed(_)));
    }

    #[test]
    fn test_downscale_to_fit_bounds_long_side() {
        let img = GrayImage::from_pixel(1, 20_000, Luma([255]));
        let bounded = downscale_to_fit(&img, 2048, FilterType::Lanczos3);
        assert_eq!(bounded.dimensions(), (1, 2048));

        let img = GrayImage::from_pixel(3000, 1500, Luma([40]));
        let bounded = downscale_to_fit(&img, 1000, FilterType::Triangle);
        assert_eq!(bounded.dimensions(), (1000, 500));
        assert!(bounded.pixels().all(|p| p.0[0] == 40));
    }

    #[test]
    fn test_resize_gray_image() {
        let img = GrayImage::from_pixel(56, 56, Luma([128]));
        let resized = resize_gray_image(&img, 28, 28, FilterType::Triangle);
        assert_eq!(resized.dimensions(), (28, 28));
        assert!(resized.pixels().all(|p| p.0[0] == 128));
    }
}
