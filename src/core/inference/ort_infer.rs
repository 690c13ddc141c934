//! ONNX Runtime engine for classifiers that expose a label output and a score output.
//!
//! Classical classifiers exported to ONNX (for example an SVM converted with
//! skl2onnx, `zipmap` disabled) produce two outputs per run: an int64 label tensor of
//! shape `(batch,)` and a float score tensor of shape `(batch, classes)` holding the
//! raw decision function.

use crate::core::batch::Tensor2D;
use crate::core::errors::DigitError;
use ort::{session::Session, value::ValueType};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

/// Default name of the label output produced by skl2onnx.
pub const DEFAULT_LABEL_OUTPUT: &str = "label";

/// Default name of the score output produced by skl2onnx.
pub const DEFAULT_MARGIN_OUTPUT: &str = "probabilities";

/// Both outputs of a single forward pass.
#[derive(Debug, Clone)]
pub struct ClassifierOutputs {
    /// One predicted label per sample.
    pub labels: Vec<i64>,
    /// Raw per-class scores, shape `(batch, classes)`.
    pub margins: Tensor2D,
}

/// A single ONNX Runtime session plus the tensor names used to drive it.
pub struct OrtInfer {
    pub(super) session: Mutex<Session>,
    pub(super) input_name: String,
    pub(super) label_output: String,
    pub(super) margin_output: String,
    pub(super) model_path: PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("input_name", &self.input_name)
            .field("label_output", &self.label_output)
            .field("margin_output", &self.margin_output)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Opens a model and resolves its tensor names.
    ///
    /// When `input_name` is `None` the first model input is used. Output names default
    /// to [`DEFAULT_LABEL_OUTPUT`] and [`DEFAULT_MARGIN_OUTPUT`]. Every name is checked
    /// against the model so a wrong name fails here, not on the first prediction.
    pub fn new(
        model_path: impl AsRef<Path>,
        model_name: Option<&str>,
        input_name: Option<&str>,
        label_output: Option<&str>,
        margin_output: Option<&str>,
    ) -> Result<Self, DigitError> {
        let path = model_path.as_ref();
        let session = super::load_session(path)?;

        let input_name = match input_name {
            Some(name) => name.to_string(),
            None => session
                .inputs
                .first()
                .map(|input| input.name.clone())
                .ok_or_else(|| {
                    DigitError::model_load(path, "model declares no inputs", None::<DigitError>)
                })?,
        };
        let label_output = label_output.unwrap_or(DEFAULT_LABEL_OUTPUT).to_string();
        let margin_output = margin_output.unwrap_or(DEFAULT_MARGIN_OUTPUT).to_string();

        if !session.inputs.iter().any(|input| input.name == input_name) {
            return Err(DigitError::model_load(
                path,
                format!("model has no input named '{input_name}'"),
                None::<DigitError>,
            ));
        }
        for required in [&label_output, &margin_output] {
            if !session.outputs.iter().any(|output| &output.name == required) {
                return Err(DigitError::model_load(
                    path,
                    format!("model has no output named '{required}'"),
                    None::<DigitError>,
                ));
            }
        }

        let model_name = model_name
            .map(str::to_string)
            .or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| "unknown_model".to_string());

        Ok(OrtInfer {
            session: Mutex::new(session),
            input_name,
            label_output,
            margin_output,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Attempts to retrieve the shape of the configured input tensor.
    ///
    /// Dynamic dimensions (e.g. `-1`) are returned as-is.
    pub fn input_shape(&self) -> Option<Vec<i64>> {
        let session = self.session.lock().ok()?;
        let input = session
            .inputs
            .iter()
            .find(|input| input.name == self.input_name)?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Feature count of the input when the model declares it statically.
    pub fn static_feature_dim(&self) -> Option<usize> {
        self.input_shape()?
            .last()
            .copied()
            .filter(|&dim| dim > 0)
            .map(|dim| dim as usize)
    }
}
