//! Configuration for the recognition pipeline.
//!
//! All configuration structs are `serde` serializable so a whole pipeline can be
//! described in a single JSON document and loaded with [`PipelineConfig::from_json_file`].
//! Every struct implements [`ConfigValidator`]; invalid values surface as
//! [`DigitError::ConfigError`].

use crate::core::constants::{
    CANONICAL_HEIGHT, CANONICAL_WIDTH, DEFAULT_MAX_CANVAS_SIDE, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_MIN_FILE_SIZE,
};
use crate::core::errors::{DigitError, DigitResult};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A trait for validating configuration parameters.
///
/// Mirrors the validation helpers used by the model builders: implementors provide
/// `validate` and `get_defaults`, and get the small range checks for free.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> DigitResult<()>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that image dimensions are positive.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> DigitResult<()> {
        if width == 0 || height == 0 {
            Err(DigitError::config_error(format!(
                "Image dimensions must be positive, got {}x{}",
                width, height
            )))
        } else {
            Ok(())
        }
    }

    /// Validates that a model path exists and is a file.
    fn validate_model_path(&self, path: &Path) -> DigitResult<()> {
        if !path.exists() {
            Err(DigitError::config_error(format!(
                "Model path does not exist: {}",
                path.display()
            )))
        } else if !path.is_file() {
            Err(DigitError::config_error(format!(
                "Model path is not a file: {}",
                path.display()
            )))
        } else {
            Ok(())
        }
    }
}

/// Resampling filter used to bring the square canvas down to the target resolution.
///
/// Nearest-neighbour sampling is intentionally absent: it aliases thin strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Linear (tent) filter.
    Triangle,
    /// Cubic filter.
    CatmullRom,
    /// Gaussian filter.
    Gaussian,
    /// Lanczos filter with a window of 3.
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Configuration for the canonical form normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Width of the canonical image.
    pub target_width: u32,
    /// Height of the canonical image.
    pub target_height: u32,
    /// Resampling filter.
    pub resize_filter: ResizeFilter,
    /// Longest side the grayscale image may have when it is padded. Larger images
    /// are first downscaled with `resize_filter`, keeping their aspect ratio.
    pub max_canvas_side: u32,
}

impl NormalizerConfig {
    /// Number of elements in tensors produced with this configuration.
    pub fn tensor_len(&self) -> usize {
        self.target_width as usize * self.target_height as usize
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            target_width: CANONICAL_WIDTH,
            target_height: CANONICAL_HEIGHT,
            resize_filter: ResizeFilter::default(),
            max_canvas_side: DEFAULT_MAX_CANVAS_SIDE,
        }
    }
}

impl ConfigValidator for NormalizerConfig {
    fn validate(&self) -> DigitResult<()> {
        self.validate_image_dimensions(self.target_width, self.target_height)?;
        if self.max_canvas_side == 0 {
            return Err(DigitError::config_error_with_context(
                "max_canvas_side",
                "0",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Which raw decision margin feeds the confidence calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarginSelection {
    /// Largest margin across all classes, regardless of the predicted label.
    #[default]
    MaxAcrossClasses,
    /// Margin of the class the model predicted.
    PredictedClass,
}

/// Configuration for confidence calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Margin used for calibration.
    pub margin_selection: MarginSelection,
}

impl ConfigValidator for ConfidenceConfig {
    fn validate(&self) -> DigitResult<()> {
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Configuration for locating and loading the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the model file (`.onnx` or `.json`).
    pub model_path: Option<PathBuf>,
    /// Display name of the model, used in logs and errors.
    pub model_name: Option<String>,
    /// Lower-case hex SHA-256 digests the model file may have. Empty accepts any file.
    pub allowed_sha256: Vec<String>,
    /// Name of the ONNX input tensor (first input when absent).
    pub input_name: Option<String>,
    /// Name of the ONNX output holding the predicted label.
    pub label_output: Option<String>,
    /// Name of the ONNX output holding the per-class decision margins.
    pub margin_output: Option<String>,
}

impl ConfigValidator for ModelConfig {
    fn validate(&self) -> DigitResult<()> {
        if let Some(path) = &self.model_path {
            self.validate_model_path(path)?;
        }
        for digest in &self.allowed_sha256 {
            let well_formed =
                digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit());
            if !well_formed {
                return Err(DigitError::config_error_with_context(
                    "allowed_sha256",
                    digest,
                    "expected 64 hexadecimal characters",
                ));
            }
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Limits enforced by the upload guard before an image is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    /// Smallest accepted file size in bytes.
    pub min_file_size: u64,
    /// Largest accepted file size in bytes.
    pub max_file_size: u64,
    /// Require a PNG or JPEG file signature.
    pub enforce_signature: bool,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_file_size: DEFAULT_MIN_FILE_SIZE,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            enforce_signature: true,
        }
    }
}

impl ConfigValidator for InputLimits {
    fn validate(&self) -> DigitResult<()> {
        if self.max_file_size == 0 {
            return Err(DigitError::config_error_with_context(
                "max_file_size",
                "0",
                "must be greater than 0",
            ));
        }
        if self.min_file_size > self.max_file_size {
            return Err(DigitError::config_error(format!(
                "min_file_size ({}) exceeds max_file_size ({})",
                self.min_file_size, self.max_file_size
            )));
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Normalizer settings.
    pub normalizer: NormalizerConfig,
    /// Confidence calibration settings.
    pub confidence: ConfidenceConfig,
    /// Model loading settings.
    pub model: ModelConfig,
    /// Upload guard limits.
    pub input: InputLimits,
}

impl PipelineConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> DigitResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DigitError::config_error(format!("invalid JSON configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: &Path) -> DigitResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DigitError::config_error(format!(
                "failed to read configuration file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&content)
    }
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> DigitResult<()> {
        self.normalizer.validate()?;
        self.confidence.validate()?;
        self.model.validate()?;
        self.input.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
