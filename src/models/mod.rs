//! Model implementations for digit recognition.
//!
//! All classifiers implement [`DigitClassifier`](crate::core::DigitClassifier) so the
//! predictor does not depend on a particular backend.

pub mod classification;

pub use classification::*;
