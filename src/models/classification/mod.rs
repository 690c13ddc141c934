//! Digit classification models.
//!
//! Two backends implement [`DigitClassifier`]:
//! - [`OnnxDigitClassifier`] for `.onnx` exports run through ONNX Runtime
//! - [`LinearDigitClassifier`] for linear models stored as JSON
//!
//! [`load_classifier`] picks the backend from the file extension after checking the
//! file against the configured digests.

pub mod linear;
pub mod onnx_classifier;

pub use linear::{LinearDigitClassifier, LinearModelFile};
pub use onnx_classifier::{OnnxDigitClassifier, OnnxDigitClassifierBuilder};

use crate::core::config::ModelConfig;
use crate::core::errors::{DigitError, DigitResult};
use crate::core::integrity::verify_model_integrity;
use crate::core::traits::DigitClassifier;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loads a classifier from disk.
///
/// # Arguments
///
/// * `path` - Model file, `.onnx` or `.json`
/// * `config` - Digest allow-list, display name and ONNX tensor names
///
/// # Returns
///
/// A shareable classifier handle, or a model load error if the file is missing,
/// fails the integrity check, has an unknown extension or cannot be parsed.
pub fn load_classifier(path: &Path, config: &ModelConfig) -> DigitResult<Arc<dyn DigitClassifier>> {
    if !path.is_file() {
        return Err(DigitError::model_load(
            path,
            "model file not found",
            None::<DigitError>,
        ));
    }

    let digest = verify_model_integrity(path, &config.allowed_sha256)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let classifier: Arc<dyn DigitClassifier> = match extension.as_deref() {
        Some("onnx") => Arc::new(
            OnnxDigitClassifierBuilder::new()
                .with_model_config(config)
                .build(path)?,
        ),
        Some("json") => {
            let mut linear = LinearDigitClassifier::from_json_file(path)?;
            if let Some(name) = &config.model_name {
                linear = linear.with_model_name(name);
            }
            Arc::new(linear)
        }
        other => {
            return Err(DigitError::model_load(
                path,
                format!(
                    "unsupported model format {:?}, expected .onnx or .json",
                    other.unwrap_or("")
                ),
                None::<DigitError>,
            ));
        }
    };

    info!(
        model = classifier.model_name(),
        path = %path.display(),
        sha256 = %digest,
        input_dim = classifier.input_dim(),
        "Loaded digit classifier"
    );

    Ok(classifier)
}
