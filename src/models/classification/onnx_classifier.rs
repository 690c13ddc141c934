//! Digit classifier backed by an ONNX model.

use crate::core::batch::Tensor2D;
use crate::core::config::ModelConfig;
use crate::core::constants::{CANONICAL_LEN, DIGIT_CLASSES};
use crate::core::errors::DigitResult;
use crate::core::inference::{ClassifierOutputs, OrtInfer};
use crate::core::traits::DigitClassifier;
use crate::core::validation::validate_tensor_len;
use std::path::Path;
use tracing::debug;

/// Adapter exposing an [`OrtInfer`] session as a [`DigitClassifier`].
#[derive(Debug)]
pub struct OnnxDigitClassifier {
    /// ONNX Runtime inference engine
    inference: OrtInfer,
    /// Features per sample
    input_dim: usize,
    /// Labels in score column order
    classes: Vec<i64>,
}

impl OnnxDigitClassifier {
    /// Creates a new ONNX digit classifier.
    pub fn new(inference: OrtInfer, input_dim: usize, classes: Vec<i64>) -> Self {
        Self {
            inference,
            input_dim,
            classes,
        }
    }

    /// The underlying inference engine.
    pub fn inference(&self) -> &OrtInfer {
        &self.inference
    }

    fn run(&self, batch: &Tensor2D) -> DigitResult<ClassifierOutputs> {
        validate_tensor_len(batch.ncols(), self.input_dim, self.inference.model_name())?;
        self.inference.infer(batch)
    }
}

impl DigitClassifier for OnnxDigitClassifier {
    fn model_name(&self) -> &str {
        self.inference.model_name()
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn class_labels(&self) -> &[i64] {
        &self.classes
    }

    fn classify(&self, batch: &Tensor2D) -> DigitResult<Vec<i64>> {
        Ok(self.run(batch)?.labels)
    }

    fn decision_margins(&self, batch: &Tensor2D) -> DigitResult<Tensor2D> {
        Ok(self.run(batch)?.margins)
    }

    fn classify_with_margins(&self, batch: &Tensor2D) -> DigitResult<(Vec<i64>, Tensor2D)> {
        let ClassifierOutputs { labels, margins } = self.run(batch)?;
        Ok((labels, margins))
    }
}

/// Builder for [`OnnxDigitClassifier`].
#[derive(Debug, Default)]
pub struct OnnxDigitClassifierBuilder {
    model_name: Option<String>,
    input_name: Option<String>,
    label_output: Option<String>,
    margin_output: Option<String>,
    input_dim: Option<usize>,
    classes: Option<Vec<i64>>,
}

impl OnnxDigitClassifierBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the tensor names and model name from a [`ModelConfig`].
    pub fn with_model_config(mut self, config: &ModelConfig) -> Self {
        self.model_name = config.model_name.clone();
        self.input_name = config.input_name.clone();
        self.label_output = config.label_output.clone();
        self.margin_output = config.margin_output.clone();
        self
    }

    /// Sets the display name.
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Overrides the feature count instead of reading it from the model.
    pub fn input_dim(mut self, dim: usize) -> Self {
        self.input_dim = Some(dim);
        self
    }

    /// Sets the class labels in score column order.
    pub fn classes(mut self, classes: Vec<i64>) -> Self {
        self.classes = Some(classes);
        self
    }

    /// Opens the model and builds the classifier.
    ///
    /// When no input dimension is given, the static feature dimension declared by the
    /// model is used, falling back to the canonical tensor length for dynamic inputs.
    /// Classes default to the ten digits.
    pub fn build(self, model_path: &Path) -> DigitResult<OnnxDigitClassifier> {
        let inference = OrtInfer::new(
            model_path,
            self.model_name.as_deref(),
            self.input_name.as_deref(),
            self.label_output.as_deref(),
            self.margin_output.as_deref(),
        )?;

        let input_dim = self
            .input_dim
            .or_else(|| inference.static_feature_dim())
            .unwrap_or(CANONICAL_LEN);
        let classes = self.classes.unwrap_or_else(|| DIGIT_CLASSES.to_vec());

        debug!(
            model = inference.model_name(),
            input_dim,
            classes = classes.len(),
            "Loaded ONNX digit classifier"
        );

        Ok(OnnxDigitClassifier::new(inference, input_dim, classes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::DigitError;

    #[test]
    fn test_builder_missing_model() {
        let result = OnnxDigitClassifierBuilder::new()
            .model_name("svm")
            .input_dim(784)
            .build(Path::new("/nonexistent/model.onnx"));
        assert!(matches!(result, Err(DigitError::ModelLoad { .. })));
    }

    #[test]
    fn test_builder_takes_model_config() {
        let config = ModelConfig {
            model_name: Some("svm".to_string()),
            label_output: Some("output_label".to_string()),
            ..ModelConfig::default()
        };
        let builder = OnnxDigitClassifierBuilder::new().with_model_config(&config);
        assert_eq!(builder.model_name.as_deref(), Some("svm"));
        assert_eq!(builder.label_output.as_deref(), Some("output_label"));
        assert!(builder.margin_output.is_none());
    }
}
