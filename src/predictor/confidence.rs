//! Confidence-scored prediction on top of a [`DigitClassifier`].
//!
//! The classifier's raw decision margin is unbounded, so it is squashed through the
//! logistic function to produce a value in `(0, 1)`. Which margin is squashed is
//! controlled by [`MarginSelection`].

use crate::core::config::{ConfidenceConfig, MarginSelection};
use crate::core::constants::CANONICAL_LEN;
use crate::core::errors::{DigitError, DigitResult};
use crate::core::traits::DigitClassifier;
use crate::core::validation::validate_tensor_len;
use crate::processors::CanonicalTensor;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Largest `f64` strictly below one.
const CONFIDENCE_CEIL: f64 = 1.0 - f64::EPSILON / 2.0;

/// A predicted digit and its calibrated confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// The predicted digit, `0..=9`.
    pub digit: u8,
    /// Logistic-calibrated confidence in `(0, 1)`.
    pub confidence: f64,
}

/// Maps a raw decision margin into `(0, 1)` with the logistic function.
///
/// A margin of `0.0` yields exactly `0.5`. For margins whose logistic value rounds to
/// `0.0` or `1.0` in `f64` the result is clamped to the nearest representable value
/// inside the open interval.
pub fn calibrate_confidence(margin: f64) -> f64 {
    let confidence = 1.0 / (1.0 + (-margin).exp());
    confidence.clamp(f64::MIN_POSITIVE, CONFIDENCE_CEIL)
}

/// Produces a [`PredictionResult`] from a canonical tensor.
///
/// The classifier is checked once at construction: its input dimensionality must
/// match the tensor length and it must declare at least one class. Afterwards every
/// prediction is a single [`classify_with_margins`](DigitClassifier::classify_with_margins)
/// call, with no retries.
#[derive(Debug, Clone)]
pub struct ConfidencePredictor {
    classifier: Arc<dyn DigitClassifier>,
    config: ConfidenceConfig,
}

impl ConfidencePredictor {
    /// Creates a predictor for canonical tensors of the default length.
    pub fn new(classifier: Arc<dyn DigitClassifier>, config: ConfidenceConfig) -> DigitResult<Self> {
        Self::with_tensor_len(classifier, config, CANONICAL_LEN)
    }

    /// Creates a predictor for tensors of `tensor_len` elements.
    ///
    /// # Errors
    ///
    /// Returns an inference error if the classifier expects a different input
    /// dimensionality or declares no classes.
    pub fn with_tensor_len(
        classifier: Arc<dyn DigitClassifier>,
        config: ConfidenceConfig,
        tensor_len: usize,
    ) -> DigitResult<Self> {
        validate_tensor_len(tensor_len, classifier.input_dim(), classifier.model_name())?;
        if classifier.class_labels().is_empty() {
            return Err(DigitError::inference_msg(
                classifier.model_name(),
                "classifier declares no classes, cannot compute decision margins",
            ));
        }
        Ok(Self { classifier, config })
    }

    /// The wrapped classifier.
    pub fn classifier(&self) -> &Arc<dyn DigitClassifier> {
        &self.classifier
    }

    /// The active configuration.
    pub fn config(&self) -> &ConfidenceConfig {
        &self.config
    }

    /// Predicts the digit in `tensor` together with a calibrated confidence.
    ///
    /// # Errors
    ///
    /// Every failure is an inference error: a tensor of the wrong length, a failing
    /// model call (with the cause attached), an empty or non-finite margin row, or a
    /// label that is not a digit.
    pub fn predict(&self, tensor: &CanonicalTensor) -> DigitResult<PredictionResult> {
        let model_name = self.classifier.model_name();
        validate_tensor_len(tensor.len(), self.classifier.input_dim(), model_name)?;

        let batch = tensor
            .to_batch()
            .map_err(|e| DigitError::inference(model_name, "cannot reshape tensor into a batch", e))?;

        let (labels, margins) = self
            .classifier
            .classify_with_margins(&batch)
            .map_err(|e| e.into_inference(model_name, "classify with margins"))?;
        let label = labels
            .first()
            .copied()
            .ok_or_else(|| DigitError::inference_msg(model_name, "classifier returned no label"))?;

        let row: Vec<f64> = margins
            .outer_iter()
            .next()
            .map(|row| row.iter().map(|&m| m as f64).collect())
            .unwrap_or_default();

        if row.is_empty() {
            return Err(DigitError::inference_msg(
                model_name,
                "classifier returned no decision margins",
            ));
        }
        if let Some(bad) = row.iter().find(|m| !m.is_finite()) {
            return Err(DigitError::inference_msg(
                model_name,
                format!("decision margin is not finite: {bad}"),
            ));
        }

        let digit = u8::try_from(label)
            .ok()
            .filter(|d| *d <= 9)
            .ok_or_else(|| {
                DigitError::inference_msg(model_name, format!("label {label} is not a digit"))
            })?;

        let margin = self.select_margin(&row, label)?;
        let confidence = calibrate_confidence(margin);

        debug!(
            model = model_name,
            label,
            margin,
            confidence,
            selection = ?self.config.margin_selection,
            "Predicted digit"
        );

        Ok(PredictionResult { digit, confidence })
    }

    fn select_margin(&self, row: &[f64], label: i64) -> DigitResult<f64> {
        match self.config.margin_selection {
            MarginSelection::MaxAcrossClasses => {
                Ok(row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            }
            MarginSelection::PredictedClass => {
                let column = self
                    .classifier
                    .class_labels()
                    .iter()
                    .position(|&c| c == label)
                    .ok_or_else(|| {
                        DigitError::inference_msg(
                            self.classifier.model_name(),
                            format!("predicted label {label} is not among the classifier's classes"),
                        )
                    })?;
                row.get(column).copied().ok_or_else(|| {
                    DigitError::inference_msg(
                        self.classifier.model_name(),
                        format!(
                            "margin row has {} columns, no margin for class index {column}",
                            row.len()
                        ),
                    )
                })
            }
        }
    }
}
