//! Error types for the digit recognition pipeline.
//!
//! Every failure a caller can observe falls into one of a small number of kinds:
//! the image could not be turned into a canonical tensor ([`DigitError::Preprocessing`]),
//! the classifier could not produce a prediction ([`DigitError::Inference`]), or one of
//! the outer collaborators (model loading, configuration, upload guard) refused to
//! continue. Each variant carries enough context (file, step, model) to be logged and
//! surfaced to an end user.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Boxed error used as the underlying cause of a [`DigitError`].
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Step of the normalization pipeline in which a preprocessing error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Reading or decoding the image file.
    Decode,
    /// Checking dimensions of the decoded image.
    Validation,
    /// Resampling to the target resolution.
    Resize,
    /// Rescaling and flattening into the canonical tensor.
    Flatten,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Decode => write!(f, "decode"),
            ProcessingStage::Validation => write!(f, "validation"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Flatten => write!(f, "flatten"),
        }
    }
}

/// Enum representing the errors that can occur while recognizing a digit.
#[derive(Error, Debug)]
pub enum DigitError {
    /// The input could not be normalized into a canonical tensor.
    #[error("preprocessing failed during {stage}: {context}")]
    Preprocessing {
        /// The normalization step that failed.
        stage: ProcessingStage,
        /// Additional context (file path, dimensions, ...).
        context: String,
        /// The underlying cause.
        #[source]
        source: BoxedError,
    },

    /// The classifier could not produce a prediction for a canonical tensor.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// Additional context about the failing call.
        context: String,
        /// The underlying cause.
        #[source]
        source: BoxedError,
    },

    /// The classifier could not be loaded.
    #[error("failed to load model from '{}': {context}", .path.display())]
    ModelLoad {
        /// Path of the model file.
        path: PathBuf,
        /// Description of what went wrong.
        context: String,
        /// The underlying cause, when there is one.
        #[source]
        source: Option<BoxedError>,
    },

    /// A configuration value or file is invalid.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// The upload guard refused the input file before decoding.
    #[error("input rejected: {message}")]
    InputRejected {
        /// Why the file was refused.
        message: String,
    },
}

/// Convenient result alias for digit recognition operations.
pub type DigitResult<T> = Result<T, DigitError>;

/// Message-only error used as a source when no lower-level error exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new simple error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleError {}

impl DigitError {
    /// Creates a preprocessing error for the given stage.
    ///
    /// # Arguments
    ///
    /// * `stage` - The normalization step that failed.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn preprocessing(
        stage: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Preprocessing {
            stage,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a preprocessing error whose cause is only a message.
    pub fn preprocessing_msg(stage: ProcessingStage, context: impl Into<String>) -> Self {
        let context = context.into();
        Self::Preprocessing {
            stage,
            source: Box::new(SimpleError::new(context.clone())),
            context,
        }
    }

    /// Creates an inference error for the named model.
    ///
    /// # Arguments
    ///
    /// * `model_name` - The model whose call failed.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn inference(
        model_name: impl Into<String>,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an inference error whose cause is only a message.
    pub fn inference_msg(model_name: impl Into<String>, context: impl Into<String>) -> Self {
        let context = context.into();
        Self::Inference {
            model_name: model_name.into(),
            source: Box::new(SimpleError::new(context.clone())),
            context,
        }
    }

    /// Creates a model loading error.
    pub fn model_load(
        path: &Path,
        context: impl Into<String>,
        error: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            context: context.into(),
            source: error.map(|e| Box::new(e) as BoxedError),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a configuration error naming the offending field.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }

    /// Creates an upload guard rejection.
    pub fn input_rejected(message: impl Into<String>) -> Self {
        Self::InputRejected {
            message: message.into(),
        }
    }

    /// Re-labels any error raised by a model call as an inference error.
    ///
    /// Errors that are already `Inference` pass through untouched; anything else is
    /// attached as the source of a new `Inference` error for `model_name`.
    pub fn into_inference(self, model_name: &str, context: &str) -> Self {
        match self {
            err @ Self::Inference { .. } => err,
            other => Self::inference(model_name, context, other),
        }
    }

    /// Returns `true` for errors raised while normalizing the input image.
    pub fn is_preprocessing(&self) -> bool {
        matches!(self, Self::Preprocessing { .. })
    }

    /// Returns `true` for errors raised while running the classifier.
    pub fn is_inference(&self) -> bool {
        matches!(self, Self::Inference { .. })
    }
}
