//! Canonical form normalization.
//!
//! Turns an arbitrary decoded image into the fixed-resolution, dark-background,
//! unit-range tensor the classifier was trained on:
//!
//! 1. reject zero-area images
//! 2. reduce to a single luminance channel
//! 3. detect background polarity and invert light backgrounds
//! 4. pad to a square on a black canvas, keeping the aspect ratio (images longer
//!    than the configured canvas bound are downscaled first)
//! 5. resample to the target resolution
//! 6. scale intensities to `[0, 1]` and flatten row-major

use crate::core::config::{ConfigValidator, NormalizerConfig};
use crate::core::constants::{CANVAS_FILL, MAX_INTENSITY};
use crate::core::errors::{DigitError, DigitResult, ProcessingStage};
use crate::core::validation::validate_image_dimensions;
use crate::processors::polarity::BackgroundPolarityDetector;
use crate::processors::types::{CanonicalTensor, Polarity};
use crate::processors::utils::{downscale_to_fit, invert_gray, pad_to_square, resize_gray_image};
use crate::utils::{dynamic_to_gray, load_image, load_image_from_memory};
use image::{DynamicImage, GrayImage};
use std::path::Path;
use tracing::debug;

/// Converts decoded images into [`CanonicalTensor`]s.
///
/// The normalizer holds no per-image state. Every call builds a fresh tensor, and
/// the same input always yields the same output.
#[derive(Debug, Clone)]
pub struct CanonicalFormNormalizer {
    config: NormalizerConfig,
    detector: BackgroundPolarityDetector,
}

impl Default for CanonicalFormNormalizer {
    fn default() -> Self {
        Self {
            config: NormalizerConfig::default(),
            detector: BackgroundPolarityDetector::default(),
        }
    }
}

impl CanonicalFormNormalizer {
    /// Creates a normalizer for the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Target resolution and resampling filter
    ///
    /// # Returns
    ///
    /// A Result containing the normalizer, or a configuration error if the target
    /// resolution has zero area.
    pub fn new(config: NormalizerConfig) -> DigitResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector: BackgroundPolarityDetector::default(),
        })
    }

    /// Replaces the polarity detector.
    pub fn with_detector(mut self, detector: BackgroundPolarityDetector) -> Self {
        self.detector = detector;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Length of every tensor this normalizer produces.
    pub fn tensor_len(&self) -> usize {
        self.config.tensor_len()
    }

    /// Normalizes a decoded image of any size, channel count or bit depth.
    ///
    /// # Errors
    ///
    /// Returns a preprocessing error at the validation stage if the image has zero
    /// width or height.
    pub fn normalize(&self, image: &DynamicImage) -> DigitResult<CanonicalTensor> {
        self.normalize_decoded(image, "decoded image")
    }

    /// Normalizes an image that is already single-channel.
    pub fn normalize_gray(&self, gray: GrayImage) -> DigitResult<CanonicalTensor> {
        self.canonicalize(gray, "grayscale image")
    }

    /// Decodes and normalizes an image file.
    ///
    /// Errors name the file.
    pub fn normalize_path(&self, path: &Path) -> DigitResult<CanonicalTensor> {
        let image = load_image(path)?;
        self.normalize_decoded(&image, &path.display().to_string())
    }

    /// Decodes and normalizes an in-memory encoded image.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> DigitResult<CanonicalTensor> {
        let context = "in-memory image";
        let image = load_image_from_memory(bytes, context)?;
        self.normalize_decoded(&image, context)
    }

    /// Reports the polarity a grayscale image would be normalized with.
    pub fn polarity_of(&self, gray: &GrayImage) -> Polarity {
        self.detector.detect(gray)
    }

    fn normalize_decoded(&self, image: &DynamicImage, context: &str) -> DigitResult<CanonicalTensor> {
        validate_image_dimensions(image.width(), image.height(), context)?;
        self.canonicalize(dynamic_to_gray(image), context)
    }

    fn canonicalize(&self, mut gray: GrayImage, context: &str) -> DigitResult<CanonicalTensor> {
        let (width, height) = gray.dimensions();
        validate_image_dimensions(width, height, context)?;

        let polarity = self.detector.detect(&gray);
        if polarity.needs_inversion() {
            invert_gray(&mut gray);
        }

        let filter = self.config.resize_filter.into();
        let bounded = downscale_to_fit(&gray, self.config.max_canvas_side, filter);
        let (square, offset) = pad_to_square(&bounded, CANVAS_FILL);
        let resized = resize_gray_image(
            &square,
            self.config.target_width,
            self.config.target_height,
            filter,
        );

        let tensor = self.flatten(&resized)?;

        debug!(
            source = context,
            width,
            height,
            %polarity,
            canvas = square.width(),
            offset_x = offset.0,
            offset_y = offset.1,
            mean = tensor.mean(),
            "Normalized image to {}x{}",
            self.config.target_width,
            self.config.target_height
        );

        Ok(tensor)
    }

    fn flatten(&self, resized: &GrayImage) -> DigitResult<CanonicalTensor> {
        if resized.dimensions() != (self.config.target_width, self.config.target_height) {
            return Err(DigitError::preprocessing_msg(
                ProcessingStage::Resize,
                format!(
                    "resampler produced {}x{}, expected {}x{}",
                    resized.width(),
                    resized.height(),
                    self.config.target_width,
                    self.config.target_height
                ),
            ));
        }

        let values: Vec<f32> = resized
            .as_raw()
            .iter()
            .map(|&v| v as f32 / MAX_INTENSITY)
            .collect();

        CanonicalTensor::new(values, self.config.target_width, self.config.target_height)
    }
}
