//! # Digit Recognizer
//!
//! A Rust library that recognizes a single handwritten digit in an image and reports
//! a calibrated confidence for it.
//!
//! ## Features
//!
//! - Accepts images of any size, channel layout and background polarity
//! - Deterministic normalization into the 28x28 dark-background form classical
//!   digit classifiers are trained on
//! - Pluggable classifiers behind the [`DigitClassifier`](core::DigitClassifier) trait
//! - ONNX Runtime integration for exported models, plus a JSON linear model format
//! - Logistic confidence calibration of raw decision margins
//! - SHA-256 model integrity checks and an optional upload guard
//!
//! ## Components
//!
//! - **Background polarity detection**: decides from border samples whether the
//!   background is light or dark
//! - **Canonical form normalization**: grayscale, polarity correction, square padding,
//!   resampling and flattening
//! - **Confidence prediction**: label plus calibrated confidence from a classifier
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, validation, the classifier trait and ONNX Runtime
//! * [`models`] - Classifier implementations and the model loader
//! * [`predictor`] - Confidence prediction and the end-to-end predictor
//! * [`processors`] - Polarity detection and normalization
//! * [`utils`] - Image decoding helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use digit_recognizer::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = load_classifier(Path::new("models/digits.onnx"), &ModelConfig::default())?;
//! let predictor = DigitPredictor::builder(classifier).build()?;
//!
//! let result = predictor.predict_path(Path::new("seven.png"))?;
//! println!("{} ({:.3})", result.digit, result.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Configuration
//!
//! ```rust
//! use digit_recognizer::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::from_json_str(r#"
//! {
//!   "normalizer": { "resize_filter": "Triangle" },
//!   "confidence": { "margin_selection": "PredictedClass" }
//! }
//! "#)?;
//! assert_eq!(config.normalizer.target_width, 28);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod models;
pub mod predictor;
pub mod processors;
pub mod utils;

#[cfg(test)]
mod test_utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use digit_recognizer::prelude::*;
/// ```
///
/// Included items cover the common path from a model file and an image to a result.
/// For the individual stages import from [`processors`](crate::processors) and
/// [`predictor`](crate::predictor) directly.
pub mod prelude {
    // End-to-end prediction
    pub use crate::predictor::{DigitPredictor, DigitPredictorBuilder, PredictionResult};

    // Model loading
    pub use crate::core::DigitClassifier;
    pub use crate::models::load_classifier;

    // Configuration
    pub use crate::core::config::{
        ConfidenceConfig, InputLimits, MarginSelection, ModelConfig, NormalizerConfig,
        PipelineConfig, ResizeFilter,
    };

    // Error handling
    pub use crate::core::{DigitError, DigitResult};

    // Image utility
    pub use crate::utils::load_image;
}
