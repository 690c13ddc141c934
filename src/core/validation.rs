//! Input validation utilities.
//!
//! Small checks shared across the pipeline plus the upload guard, which refuses
//! files by size and signature before any decoding is attempted.

use crate::core::config::InputLimits;
use crate::core::constants::{JPEG_SIGNATURE, PNG_SIGNATURE};
use crate::core::errors::{DigitError, DigitResult, ProcessingStage, SimpleError};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Validates that a float value is finite (not NaN or infinite).
#[inline]
pub fn validate_finite(value: f32, param_name: &str) -> Result<(), SimpleError> {
    if !value.is_finite() {
        return Err(SimpleError::new(format!(
            "Parameter '{}' must be finite, got: {}",
            param_name, value
        )));
    }
    Ok(())
}

/// Validates that a decoded image has a non-zero area.
pub fn validate_image_dimensions(width: u32, height: u32, context: &str) -> DigitResult<()> {
    if width == 0 || height == 0 {
        return Err(DigitError::preprocessing_msg(
            ProcessingStage::Validation,
            format!(
                "{}: image has zero area ({}x{})",
                context, width, height
            ),
        ));
    }
    Ok(())
}

/// Validates that a flat tensor matches the dimensionality a model expects.
pub fn validate_tensor_len(actual: usize, expected: usize, model_name: &str) -> DigitResult<()> {
    if actual != expected {
        return Err(DigitError::inference_msg(
            model_name,
            format!(
                "input dimensionality mismatch: model expects {} features, tensor has {}",
                expected, actual
            ),
        ));
    }
    Ok(())
}

/// Image container formats accepted by the upload guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSignature {
    /// PNG file.
    Png,
    /// JPEG file.
    Jpeg,
}

/// Identifies a PNG or JPEG file from its leading bytes.
pub fn detect_signature(header: &[u8]) -> Option<ImageSignature> {
    if header.starts_with(&PNG_SIGNATURE) {
        Some(ImageSignature::Png)
    } else if header.starts_with(&JPEG_SIGNATURE) {
        Some(ImageSignature::Jpeg)
    } else {
        None
    }
}

/// Checks an uploaded file against size limits and, optionally, its signature.
///
/// # Errors
///
/// Returns [`DigitError::InputRejected`] when the file is missing, too small, too
/// large, or (with `enforce_signature`) neither PNG nor JPEG.
pub fn validate_upload(path: &Path, limits: &InputLimits) -> DigitResult<Option<ImageSignature>> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        DigitError::input_rejected(format!("cannot stat '{}': {e}", path.display()))
    })?;
    let size = metadata.len();

    if size < limits.min_file_size {
        return Err(DigitError::input_rejected(format!(
            "file is too small: {} bytes (minimum: {} bytes)",
            size, limits.min_file_size
        )));
    }
    if size > limits.max_file_size {
        return Err(DigitError::input_rejected(format!(
            "file is too large: {} bytes (maximum: {} bytes)",
            size, limits.max_file_size
        )));
    }

    if !limits.enforce_signature {
        return Ok(None);
    }

    let mut header = [0u8; 16];
    let read = std::fs::File::open(path)
        .and_then(|mut file| file.read(&mut header))
        .map_err(|e| {
            DigitError::input_rejected(format!("cannot read '{}': {e}", path.display()))
        })?;

    match detect_signature(&header[..read]) {
        Some(signature) => {
            debug!(path = %path.display(), ?signature, size, "upload accepted");
            Ok(Some(signature))
        }
        None => Err(DigitError::input_rejected(format!(
            "'{}' is neither a PNG nor a JPEG file",
            path.display()
        ))),
    }
}
