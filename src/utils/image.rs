//! Utility functions for loading images.
//!
//! Decoding is the first step of normalization, so every failure here is reported
//! as a [`DigitError::Preprocessing`] at the [`ProcessingStage::Decode`] stage, with
//! the offending path in the context.

use crate::core::constants::{MAX_DECODE_ALLOC, MAX_DECODE_SIDE};
use crate::core::errors::{DigitError, ProcessingStage};
use image::{DynamicImage, GrayImage, ImageReader, Limits};
use std::io::Cursor;
use std::path::Path;

/// Converts a DynamicImage to a GrayImage.
///
/// Channel reduction uses the `image` crate's luma conversion: Rec. 709 luminance
/// weights (`0.2126 R + 0.7152 G + 0.0722 B`), alpha ignored. Single-channel inputs
/// pass through unchanged.
///
/// # Arguments
///
/// * `img` - The image to convert
///
/// # Returns
///
/// * `GrayImage` - The converted grayscale image, with the source's width and height
pub fn dynamic_to_gray(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Decodes an image from an in-memory buffer.
///
/// The format is guessed from the content, never from a file extension. Images wider
/// or taller than [`MAX_DECODE_SIDE`], or needing more than [`MAX_DECODE_ALLOC`] bytes,
/// are refused before their pixels are allocated.
///
/// # Arguments
///
/// * `bytes` - Encoded image data
/// * `context` - Description of where the bytes came from, used in errors
///
/// # Errors
///
/// Returns a preprocessing error if the buffer is empty, is not a decodable image, or
/// exceeds the decode limits.
pub fn load_image_from_memory(bytes: &[u8], context: &str) -> Result<DynamicImage, DigitError> {
    if bytes.is_empty() {
        return Err(DigitError::preprocessing_msg(
            ProcessingStage::Decode,
            format!("{context}: input is empty (0 bytes)"),
        ));
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DECODE_SIDE);
    limits.max_image_height = Some(MAX_DECODE_SIDE);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| {
            DigitError::preprocessing(
                ProcessingStage::Decode,
                format!("{context}: cannot read image header"),
                e,
            )
        })?;
    reader.limits(limits);

    reader.decode().map_err(|e| {
        DigitError::preprocessing(
            ProcessingStage::Decode,
            format!("{context}: cannot decode image"),
            e,
        )
    })
}

/// Loads and decodes an image file.
///
/// # Arguments
///
/// * `path` - Path of the image file to load
///
/// # Returns
///
/// * `Ok(DynamicImage)` - The decoded image
/// * `Err(DigitError)` - If the file cannot be read, is empty, or is not an image
pub fn load_image(path: &Path) -> Result<DynamicImage, DigitError> {
    let bytes = std::fs::read(path).map_err(|e| {
        DigitError::preprocessing(
            ProcessingStage::Decode,
            format!("cannot read image file '{}'", path.display()),
            e,
        )
    })?;
    load_image_from_memory(&bytes, &path.display().to_string())
}
