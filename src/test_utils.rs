//! Test fixtures: seven-segment digit renderings and a template-matching classifier.

use crate::models::LinearDigitClassifier;
use crate::processors::CanonicalFormNormalizer;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use ndarray::{Array1, Array2};

/// Side of the square images the templates are rendered at.
const TEMPLATE_SIDE: u32 = 56;

/// Lit segments per digit, in `abcdefg` order.
const SEGMENTS: [[bool; 7]; 10] = [
    [true, true, true, true, true, true, false],
    [false, true, true, false, false, false, false],
    [true, true, false, true, true, false, true],
    [true, true, true, true, false, false, true],
    [false, true, true, false, false, true, true],
    [true, false, true, true, false, true, true],
    [true, false, true, true, true, true, true],
    [true, true, true, false, false, false, false],
    [true, true, true, true, true, true, true],
    [true, true, true, true, false, true, true],
];

/// Renders `digit` as a bold seven-segment glyph centered in a `width x height` image.
///
/// The glyph keeps clear of the image border, so the border is pure `background`.
pub fn render_digit(digit: u8, width: u32, height: u32, background: u8, ink: u8) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([background]));

    let fx = |f: f32| (f * width as f32).round() as i32;
    let fy = |f: f32| (f * height as f32).round() as i32;
    let (left, right) = (fx(0.3), fx(0.7));
    let (top, mid, bottom) = (fy(0.15), fy(0.5), fy(0.85));
    let t = ((width.min(height) as f32 * 0.08).round() as i32).max(1);
    let span = (right - left) as u32;
    let upper = (mid - top) as u32;
    let lower = (bottom - mid) as u32;

    let rects = [
        Rect::at(left, top).of_size(span, t as u32),
        Rect::at(right - t, top).of_size(t as u32, upper),
        Rect::at(right - t, mid).of_size(t as u32, lower),
        Rect::at(left, bottom - t).of_size(span, t as u32),
        Rect::at(left, mid).of_size(t as u32, lower),
        Rect::at(left, top).of_size(t as u32, upper),
        Rect::at(left, mid - t / 2).of_size(span, t as u32),
    ];

    for (lit, rect) in SEGMENTS[digit as usize].iter().zip(rects) {
        if *lit {
            draw_filled_rect_mut(&mut img, rect, Luma([ink]));
        }
    }
    img
}

/// A linear classifier whose weight rows are the unit-normalized canonical tensors of
/// the ten rendered digits. Margins are scaled cosine similarities, so they are
/// non-negative for any normalized input.
pub fn template_classifier() -> LinearDigitClassifier {
    let normalizer = CanonicalFormNormalizer::default();
    let len = normalizer.tensor_len();
    let mut weights = Array2::<f32>::zeros((10, len));

    for digit in 0..10u8 {
        let glyph = render_digit(digit, TEMPLATE_SIDE, TEMPLATE_SIDE, 0, 255);
        let tensor = normalizer.normalize_gray(glyph).unwrap();
        let values = Array1::from(tensor.into_vec());
        let norm = values.dot(&values).sqrt();
        weights.row_mut(digit as usize).assign(&(values / norm));
    }

    LinearDigitClassifier::new(
        "seven_segment_templates",
        (0..10).collect(),
        weights,
        Array1::zeros(10),
    )
    .unwrap()
}

#[test]
fn test_rendered_digits_differ() {
    let eight = render_digit(8, 40, 40, 0, 255);
    let one = render_digit(1, 40, 40, 0, 255);
    let lit = |img: &GrayImage| img.pixels().filter(|p| p.0[0] == 255).count();
    assert!(lit(&eight) > 2 * lit(&one));
    assert_eq!(eight.get_pixel(0, 0), &Luma([0]));
}
