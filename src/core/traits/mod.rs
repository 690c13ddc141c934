//! Trait definitions for the recognition pipeline.
//!
//! The pipeline talks to trained models only through [`DigitClassifier`], so any
//! backend (ONNX Runtime, a linear model read from JSON, a mock in tests) can be
//! plugged in without the normalizer or the confidence logic knowing about it.

pub mod classifier;

pub use classifier::DigitClassifier;
