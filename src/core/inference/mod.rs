//! ONNX Runtime integration.
//!
//! This module holds the low level session handling used by
//! [`OnnxDigitClassifier`](crate::models::OnnxDigitClassifier).

pub mod ort_infer;
pub mod session;

pub use ort_infer::{ClassifierOutputs, OrtInfer};
pub use session::load_session;
