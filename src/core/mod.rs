//! The core module of the recognition pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Tensor aliases used at the classifier boundary
//! - Configuration and validation
//! - Constants describing the canonical form
//! - Error handling
//! - ONNX Runtime integration and model integrity checks
//! - The classifier trait
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod batch;
pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod integrity;
pub mod traits;
pub mod validation;

pub use crate::utils::{dynamic_to_gray, load_image, load_image_from_memory};
pub use batch::Tensor2D;
pub use config::{
    ConfidenceConfig, ConfigValidator, InputLimits, MarginSelection, ModelConfig,
    NormalizerConfig, PipelineConfig, ResizeFilter,
};
pub use constants::*;
pub use errors::{DigitError, DigitResult, ProcessingStage, SimpleError};
pub use inference::{OrtInfer, load_session};
pub use integrity::verify_model_integrity;
pub use traits::DigitClassifier;
pub use validation::validate_upload;

/// Initializes the tracing subscriber for logging.
///
/// Sets up a registry with an environment filter (`RUST_LOG`) and a formatting layer.
/// Log lines go to stderr so stdout stays free for machine-readable results.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
