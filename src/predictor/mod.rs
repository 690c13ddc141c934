//! End-to-end digit prediction.
//!
//! - `confidence`: the [`ConfidencePredictor`] turning a canonical tensor into a
//!   digit plus calibrated confidence
//!
//! [`DigitPredictor`] ties the normalizer and the confidence predictor together and is
//! the entry point most callers want. It is built once, around a classifier handle
//! that may be shared, and then used for any number of images.

pub mod confidence;

pub use confidence::{ConfidencePredictor, PredictionResult, calibrate_confidence};

use crate::core::config::{
    ConfidenceConfig, ConfigValidator, InputLimits, NormalizerConfig, PipelineConfig,
};
use crate::core::errors::DigitResult;
use crate::core::traits::DigitClassifier;
use crate::core::validation::validate_upload;
use crate::processors::{CanonicalFormNormalizer, CanonicalTensor};
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Normalizes images and predicts the digit they contain.
#[derive(Debug, Clone)]
pub struct DigitPredictor {
    normalizer: CanonicalFormNormalizer,
    confidence: ConfidencePredictor,
    input_limits: Option<InputLimits>,
}

impl DigitPredictor {
    /// Creates a builder around a classifier handle.
    pub fn builder(classifier: Arc<dyn DigitClassifier>) -> DigitPredictorBuilder {
        DigitPredictorBuilder::new(classifier)
    }

    /// Predicts the digit in an image file.
    ///
    /// When the predictor was built with input limits, the file is checked against
    /// them before it is decoded.
    ///
    /// # Errors
    ///
    /// * `InputRejected` - the upload guard refused the file
    /// * `Preprocessing` - the file is empty, unreadable, not an image or has zero area
    /// * `Inference` - the classifier failed or returned unusable output
    pub fn predict_path(&self, path: &Path) -> DigitResult<PredictionResult> {
        if let Some(limits) = &self.input_limits {
            validate_upload(path, limits)?;
        }
        let tensor = self.normalizer.normalize_path(path)?;
        let result = self.confidence.predict(&tensor)?;
        info!(
            path = %path.display(),
            digit = result.digit,
            confidence = result.confidence,
            "Prediction complete"
        );
        Ok(result)
    }

    /// Predicts the digit in an encoded in-memory image.
    pub fn predict_bytes(&self, bytes: &[u8]) -> DigitResult<PredictionResult> {
        let tensor = self.normalizer.normalize_bytes(bytes)?;
        self.confidence.predict(&tensor)
    }

    /// Predicts the digit in an already decoded image.
    pub fn predict_image(&self, image: &DynamicImage) -> DigitResult<PredictionResult> {
        let tensor = self.normalize(image)?;
        self.confidence.predict(&tensor)
    }

    /// Runs only the normalization half of the pipeline.
    pub fn normalize(&self, image: &DynamicImage) -> DigitResult<CanonicalTensor> {
        self.normalizer.normalize(image)
    }

    /// The normalizer in use.
    pub fn normalizer(&self) -> &CanonicalFormNormalizer {
        &self.normalizer
    }

    /// The confidence predictor in use.
    pub fn confidence_predictor(&self) -> &ConfidencePredictor {
        &self.confidence
    }
}

/// Builder for [`DigitPredictor`].
#[derive(Debug, Clone)]
pub struct DigitPredictorBuilder {
    classifier: Arc<dyn DigitClassifier>,
    normalizer: Option<NormalizerConfig>,
    confidence: Option<ConfidenceConfig>,
    input_limits: Option<InputLimits>,
}

impl DigitPredictorBuilder {
    /// Creates a new builder with default normalization and confidence settings.
    pub fn new(classifier: Arc<dyn DigitClassifier>) -> Self {
        Self {
            classifier,
            normalizer: None,
            confidence: None,
            input_limits: None,
        }
    }

    /// Takes the normalizer and confidence settings from a pipeline configuration.
    ///
    /// Input limits are not taken over; enable them with
    /// [`input_limits`](Self::input_limits).
    pub fn pipeline_config(mut self, config: &PipelineConfig) -> Self {
        self.normalizer = Some(config.normalizer);
        self.confidence = Some(config.confidence);
        self
    }

    /// Sets the normalizer configuration.
    pub fn normalizer_config(mut self, config: NormalizerConfig) -> Self {
        self.normalizer = Some(config);
        self
    }

    /// Sets the confidence configuration.
    pub fn confidence_config(mut self, config: ConfidenceConfig) -> Self {
        self.confidence = Some(config);
        self
    }

    /// Enables the upload guard for [`DigitPredictor::predict_path`].
    pub fn input_limits(mut self, limits: InputLimits) -> Self {
        self.input_limits = Some(limits);
        self
    }

    /// Builds the predictor.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid settings, or an inference error when
    /// the classifier's input dimensionality does not match the normalizer's output.
    pub fn build(self) -> DigitResult<DigitPredictor> {
        let normalizer_config = self.normalizer.unwrap_or_default();
        let confidence_config = self.confidence.unwrap_or_default();
        if let Some(limits) = &self.input_limits {
            limits.validate()?;
        }

        let normalizer = CanonicalFormNormalizer::new(normalizer_config)?;
        let confidence = ConfidencePredictor::with_tensor_len(
            self.classifier,
            confidence_config,
            normalizer.tensor_len(),
        )?;

        debug!(
            model = confidence.classifier().model_name(),
            width = normalizer_config.target_width,
            height = normalizer_config.target_height,
            filter = ?normalizer_config.resize_filter,
            strict_input = self.input_limits.is_some(),
            "Built digit predictor"
        );

        Ok(DigitPredictor {
            normalizer,
            confidence,
            input_limits: self.input_limits,
        })
    }
}
