//! A one-vs-rest linear classifier stored as JSON.
//!
//! The document holds one weight row and one bias per class:
//!
//! ```json
//! {
//!   "model_name": "linear_svm",
//!   "classes": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
//!   "weights": [[...784 values...], ...],
//!   "bias": [0.1, ...]
//! }
//! ```
//!
//! Decision margins are `x · Wᵀ + b`, which is what a linear SVM exposes as its
//! decision function.

use crate::core::batch::Tensor2D;
use crate::core::constants::DEFAULT_MODEL_NAME;
use crate::core::errors::{DigitError, DigitResult};
use crate::core::traits::DigitClassifier;
use crate::core::validation::{validate_finite, validate_tensor_len};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk representation of a [`LinearDigitClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelFile {
    /// Optional display name.
    #[serde(default)]
    pub model_name: Option<String>,
    /// Class labels, one per weight row.
    pub classes: Vec<i64>,
    /// Weight matrix, `classes x features`.
    pub weights: Vec<Vec<f32>>,
    /// One intercept per class.
    pub bias: Vec<f32>,
}

/// Linear classifier with one weight row per class.
#[derive(Debug, Clone)]
pub struct LinearDigitClassifier {
    model_name: String,
    classes: Vec<i64>,
    /// Shape `(classes, features)`.
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl LinearDigitClassifier {
    /// Creates a classifier from a weight matrix and bias vector.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Display name used in logs and errors
    /// * `classes` - Class labels in row order of `weights`
    /// * `weights` - Weight matrix, shape `(classes, features)`
    /// * `bias` - One intercept per class
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the shapes disagree, there are no classes or no
    /// features, or any parameter is not finite.
    pub fn new(
        model_name: impl Into<String>,
        classes: Vec<i64>,
        weights: Array2<f32>,
        bias: Array1<f32>,
    ) -> DigitResult<Self> {
        let model_name = model_name.into();
        let invalid = |reason: String| {
            DigitError::config_error(format!("linear model '{model_name}': {reason}"))
        };

        if classes.is_empty() {
            return Err(invalid("model declares no classes".to_string()));
        }
        if weights.nrows() != classes.len() || bias.len() != classes.len() {
            return Err(invalid(format!(
                "{} classes but {} weight rows and {} biases",
                classes.len(),
                weights.nrows(),
                bias.len()
            )));
        }
        if weights.ncols() == 0 {
            return Err(invalid("weight rows are empty".to_string()));
        }
        for &value in weights.iter().chain(bias.iter()) {
            validate_finite(value, "model parameter").map_err(|e| invalid(e.to_string()))?;
        }

        Ok(Self {
            model_name,
            classes,
            weights,
            bias,
        })
    }

    /// Builds a classifier from its serialized form.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for ragged or otherwise invalid parameters.
    pub fn from_model_file(file: LinearModelFile) -> DigitResult<Self> {
        let model_name = file
            .model_name
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
        let rows = file.weights.len();
        let cols = file.weights.first().map_or(0, Vec::len);
        if file.weights.iter().any(|row| row.len() != cols) {
            return Err(DigitError::config_error(format!(
                "linear model '{model_name}': weight rows have different lengths"
            )));
        }
        let flat: Vec<f32> = file.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((rows, cols), flat).map_err(|e| {
            DigitError::config_error(format!(
                "linear model '{model_name}': invalid weight matrix: {e}"
            ))
        })?;
        Self::new(model_name, file.classes, weights, Array1::from(file.bias))
    }

    /// Loads a classifier from a JSON file.
    pub fn from_json_file(path: &Path) -> DigitResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DigitError::model_load(path, "cannot read model file", Some(e))
        })?;
        let mut file: LinearModelFile = serde_json::from_str(&json).map_err(|e| {
            DigitError::model_load(path, "invalid linear model JSON", Some(e))
        })?;
        if file.model_name.is_none() {
            file.model_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string);
        }
        Self::from_model_file(file)
            .map_err(|e| DigitError::model_load(path, "invalid linear model", Some(e)))
    }

    /// Replaces the display name.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    /// Serializes the classifier into its on-disk form.
    pub fn to_model_file(&self) -> LinearModelFile {
        LinearModelFile {
            model_name: Some(self.model_name.clone()),
            classes: self.classes.clone(),
            weights: self.weights.outer_iter().map(|row| row.to_vec()).collect(),
            bias: self.bias.to_vec(),
        }
    }

    fn check_batch(&self, batch: &Tensor2D) -> DigitResult<()> {
        validate_tensor_len(batch.ncols(), self.weights.ncols(), &self.model_name)
    }

    /// Ties resolve to the lowest class index.
    fn argmax_labels(&self, margins: &Tensor2D) -> Vec<i64> {
        margins
            .axis_iter(Axis(0))
            .map(|row| {
                let mut best = 0;
                for (i, &m) in row.iter().enumerate() {
                    if m > row[best] {
                        best = i;
                    }
                }
                self.classes[best]
            })
            .collect()
    }
}

impl DigitClassifier for LinearDigitClassifier {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn input_dim(&self) -> usize {
        self.weights.ncols()
    }

    fn class_labels(&self) -> &[i64] {
        &self.classes
    }

    fn classify(&self, batch: &Tensor2D) -> DigitResult<Vec<i64>> {
        let margins = self.decision_margins(batch)?;
        Ok(self.argmax_labels(&margins))
    }

    fn decision_margins(&self, batch: &Tensor2D) -> DigitResult<Tensor2D> {
        self.check_batch(batch)?;
        Ok(batch.dot(&self.weights.t()) + &self.bias)
    }

    fn classify_with_margins(&self, batch: &Tensor2D) -> DigitResult<(Vec<i64>, Tensor2D)> {
        let margins = self.decision_margins(batch)?;
        Ok((self.argmax_labels(&margins), margins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn two_class() -> LinearDigitClassifier {
        LinearDigitClassifier::new(
            "toy",
            vec![3, 8],
            array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            array![0.0, 0.5],
        )
        .unwrap()
    }

    #[test]
    fn test_margins_are_affine() {
        let clf = two_class();
        let margins = clf.decision_margins(&array![[2.0, 1.0, 7.0]]).unwrap();
        assert_eq!(margins, array![[2.0f32, 1.5]]);
        assert_eq!(clf.classify(&array![[2.0, 1.0, 7.0]]).unwrap(), vec![3]);
        assert_eq!(clf.classify(&array![[0.0, 1.0, 0.0]]).unwrap(), vec![8]);
    }

    #[test]
    fn test_ties_pick_lowest_index() {
        let clf = two_class();
        // 0.5 + 0.0 vs 0.0 + 0.5
        assert_eq!(clf.classify(&array![[0.5, 0.0, 0.0]]).unwrap(), vec![3]);
    }

    #[test]
    fn test_dimension_mismatch_is_inference_error() {
        let clf = two_class();
        let err = clf.decision_margins(&array![[1.0, 2.0]]).unwrap_err();
        assert!(err.is_inference());
    }

    #[test]
    fn test_shape_validation() {
        let result = LinearDigitClassifier::new(
            "bad",
            vec![0, 1, 2],
            array![[1.0, 0.0], [0.0, 1.0]],
            array![0.0, 0.0],
        );
        assert!(matches!(result, Err(DigitError::ConfigError { .. })));

        let result = LinearDigitClassifier::new(
            "nan",
            vec![0],
            array![[f32::NAN]],
            array![0.0],
        );
        match result {
            Err(DigitError::ConfigError { message }) => assert!(message.contains("'nan'")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_shapes_in_file_name_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"classes": [0, 1, 2], "weights": [[1.0], [2.0]], "bias": [0.0, 0.0]}}"#
        )
        .unwrap();

        match LinearDigitClassifier::from_json_file(file.path()).unwrap_err() {
            DigitError::ModelLoad { path, source, .. } => {
                assert_eq!(path, file.path());
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_combined_call_matches_separate_calls() {
        let clf = two_class();
        let batch = array![[2.0, 1.0, 7.0], [0.0, 1.0, 0.0]];
        let (labels, margins) = clf.classify_with_margins(&batch).unwrap();
        assert_eq!(labels, clf.classify(&batch).unwrap());
        assert_eq!(margins, clf.decision_margins(&batch).unwrap());
    }

    #[test]
    fn test_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"classes": [0, 1], "weights": [[1.0, -1.0], [-1.0, 1.0]], "bias": [0.0, 0.0]}}"#
        )
        .unwrap();

        let clf = LinearDigitClassifier::from_json_file(file.path()).unwrap();
        assert_eq!(clf.input_dim(), 2);
        assert_eq!(clf.class_labels(), &[0i64, 1]);
        assert_eq!(clf.classify(&array![[0.0, 1.0]]).unwrap(), vec![1]);

        let round_trip = LinearDigitClassifier::from_model_file(clf.to_model_file()).unwrap();
        assert_eq!(round_trip.weights, clf.weights);
    }

    #[test]
    fn test_ragged_weights_rejected() {
        let file = LinearModelFile {
            model_name: None,
            classes: vec![0, 1],
            weights: vec![vec![1.0, 2.0], vec![3.0]],
            bias: vec![0.0, 0.0],
        };
        let err = LinearDigitClassifier::from_model_file(file).unwrap_err();
        assert!(matches!(err, DigitError::ConfigError { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = LinearDigitClassifier::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, DigitError::ModelLoad { .. }));
    }
}
