//! Helpers for working directly with ONNX Runtime sessions.

use crate::core::errors::DigitError;
use ort::session::Session;
use std::path::Path;

/// Creates an ONNX Runtime session for a model file.
pub fn load_session(model_path: impl AsRef<Path>) -> Result<Session, DigitError> {
    let path = model_path.as_ref();
    let session = Session::builder()
        .and_then(|b| b.commit_from_file(path))
        .map_err(|e| {
            DigitError::model_load(
                path,
                "failed to create ONNX session; verify the model file exists and is readable",
                Some(e),
            )
        })?;
    Ok(session)
}
