//! Constants shared across the recognition pipeline.

/// Width of the canonical tensor image.
pub const CANONICAL_WIDTH: u32 = 28;

/// Height of the canonical tensor image.
pub const CANONICAL_HEIGHT: u32 = 28;

/// Number of elements in a canonical tensor (`CANONICAL_WIDTH * CANONICAL_HEIGHT`).
pub const CANONICAL_LEN: usize = (CANONICAL_WIDTH * CANONICAL_HEIGHT) as usize;

/// Mean border intensity above which a background counts as light.
pub const POLARITY_MIDPOINT: f64 = 127.0;

/// Number of stride steps taken along each image edge when sampling the border.
pub const EDGE_SAMPLE_DIVISOR: u32 = 10;

/// Fill intensity used for the square canvas (darkest value).
pub const CANVAS_FILL: u8 = 0;

/// Default bound on the longer side of the grayscale image before it is padded.
///
/// Larger images are downscaled first, so the square canvas never exceeds
/// `DEFAULT_MAX_CANVAS_SIDE^2` pixels.
pub const DEFAULT_MAX_CANVAS_SIDE: u32 = 2048;

/// Largest width or height the decoder accepts.
pub const MAX_DECODE_SIDE: u32 = 32_768;

/// Largest allocation the decoder may make for a single image, in bytes (256 MiB).
pub const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

/// Largest intensity of an 8-bit grayscale pixel.
pub const MAX_INTENSITY: f32 = 255.0;

/// Digit labels the recognizer can emit, in class-index order.
pub const DIGIT_CLASSES: [i64; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Default model name used when a model does not declare one.
pub const DEFAULT_MODEL_NAME: &str = "digit_classifier";

/// Default lower bound on the size of an uploaded image file, in bytes.
pub const DEFAULT_MIN_FILE_SIZE: u64 = 100;

/// Default upper bound on the size of an uploaded image file, in bytes (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG file signature.
pub const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
