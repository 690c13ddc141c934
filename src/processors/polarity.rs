//! Background polarity detection.
//!
//! Corners alone are fragile when a stroke happens to touch one, so the detector also
//! walks each edge at a stride proportional to the image size: `max(1, dim / 10)`.
//! Larger images therefore get more samples, and every image gets at least its four
//! corners.

use crate::core::constants::{EDGE_SAMPLE_DIVISOR, POLARITY_MIDPOINT};
use crate::processors::types::Polarity;
use image::GrayImage;

/// Decides whether a grayscale image has a light or a dark background.
///
/// Detection is a pure function of the pixel values: the same image always yields
/// the same label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPolarityDetector {
    /// Mean border intensity above which the background counts as light.
    pub threshold: f64,
}

impl Default for BackgroundPolarityDetector {
    fn default() -> Self {
        Self {
            threshold: POLARITY_MIDPOINT,
        }
    }
}

impl BackgroundPolarityDetector {
    /// Creates a detector with the default midpoint threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the border samples the decision is based on.
    ///
    /// Order: the four corners, then the top and bottom edges, then the left and
    /// right edges (corners are not sampled twice by the edge walks). An empty image
    /// yields no samples.
    pub fn border_samples(&self, image: &GrayImage) -> Vec<u8> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let (right, bottom) = (width - 1, height - 1);
        let step_x = (width / EDGE_SAMPLE_DIVISOR).max(1) as usize;
        let step_y = (height / EDGE_SAMPLE_DIVISOR).max(1) as usize;
        let px = |x: u32, y: u32| image.get_pixel(x, y).0[0];

        let mut samples = vec![px(0, 0), px(right, 0), px(0, bottom), px(right, bottom)];

        for x in (step_x as u32..right).step_by(step_x) {
            samples.push(px(x, 0));
            samples.push(px(x, bottom));
        }
        for y in (step_y as u32..bottom).step_by(step_y) {
            samples.push(px(0, y));
            samples.push(px(right, y));
        }

        samples
    }

    /// Mean intensity of the border samples, `None` for an empty image.
    pub fn border_mean(&self, image: &GrayImage) -> Option<f64> {
        let samples = self.border_samples(image);
        if samples.is_empty() {
            return None;
        }
        let sum: u64 = samples.iter().map(|&v| v as u64).sum();
        Some(sum as f64 / samples.len() as f64)
    }

    /// Classifies the background polarity of `image`.
    ///
    /// An empty image has no border and is reported as [`Polarity::DarkBackground`],
    /// which leaves it untouched; the normalizer rejects such images before this point.
    pub fn detect(&self, image: &GrayImage) -> Polarity {
        match self.border_mean(image) {
            Some(mean) if mean > self.threshold => Polarity::LightBackground,
            _ => Polarity::DarkBackground,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_white_background_is_light() {
        let mut img = GrayImage::from_pixel(40, 40, Luma([255]));
        for y in 10..30 {
            for x in 18..22 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        assert_eq!(
            BackgroundPolarityDetector::new().detect(&img),
            Polarity::LightBackground
        );
    }

    #[test]
    fn test_black_background_is_dark() {
        let mut img = GrayImage::from_pixel(40, 40, Luma([0]));
        for y in 10..30 {
            for x in 18..22 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        assert_eq!(
            BackgroundPolarityDetector::new().detect(&img),
            Polarity::DarkBackground
        );
    }

    #[test]
    fn test_midpoint_is_dark() {
        let img = GrayImage::from_pixel(10, 10, Luma([127]));
        assert_eq!(
            BackgroundPolarityDetector::new().detect(&img),
            Polarity::DarkBackground
        );
        let img = GrayImage::from_pixel(10, 10, Luma([128]));
        assert_eq!(
            BackgroundPolarityDetector::new().detect(&img),
            Polarity::LightBackground
        );
    }

    #[test]
    fn test_stroke_touching_corner_does_not_flip() {
        // White page whose top-left and top-right corners are covered by ink.
        let mut img = GrayImage::from_pixel(100, 100, Luma([255]));
        for y in 0..3 {
            for x in 0..3 {
                img.put_pixel(x, y, Luma([0]));
                img.put_pixel(99 - x, y, Luma([0]));
            }
        }
        // Corners alone would average to 127.5; the edge walk keeps it clearly light.
        let detector = BackgroundPolarityDetector::new();
        assert!(detector.border_mean(&img).unwrap() > 200.0);
        assert_eq!(detector.detect(&img), Polarity::LightBackground);
    }

    #[test]
    fn test_sample_count_grows_with_size() {
        let detector = BackgroundPolarityDetector::new();
        let small = detector.border_samples(&GrayImage::new(5, 5));
        let large = detector.border_samples(&GrayImage::new(200, 200));
        // 5x5: stride 1, three interior positions per edge.
        assert_eq!(small.len(), 4 + 2 * 3 + 2 * 3);
        // 200x200: stride 20, interior positions 20, 40, ..., 180.
        assert_eq!(large.len(), 4 + 2 * 9 + 2 * 9);
    }

    #[test]
    fn test_degenerate_images() {
        let detector = BackgroundPolarityDetector::new();

        let single = GrayImage::from_pixel(1, 1, Luma([200]));
        assert_eq!(detector.border_samples(&single), vec![200; 4]);
        assert_eq!(detector.detect(&single), Polarity::LightBackground);

        let line = GrayImage::from_pixel(1, 1000, Luma([10]));
        assert_eq!(detector.detect(&line), Polarity::DarkBackground);

        assert!(detector.border_samples(&GrayImage::new(0, 0)).is_empty());
        assert_eq!(detector.detect(&GrayImage::new(0, 0)), Polarity::DarkBackground);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let img = GrayImage::from_fn(37, 23, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let detector = BackgroundPolarityDetector::new();
        let first = detector.detect(&img);
        for _ in 0..5 {
            assert_eq!(detector.detect(&img), first);
        }
    }
}
