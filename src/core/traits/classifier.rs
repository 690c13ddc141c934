//! The classifier capability required by the confidence predictor.

use crate::core::DigitResult;
use crate::core::batch::Tensor2D;
use std::fmt::Debug;

/// A trained digit classifier.
///
/// Implementations are loaded once and then used read-only: both operations take
/// `&self`, and the trait requires `Send + Sync` so a handle can be shared behind an
/// `Arc`. Whether concurrent calls are actually safe is a property of the backend
/// (the ONNX implementation serializes calls on its session).
///
/// Both operations receive a `(batch, features)` tensor where `features` equals
/// [`input_dim`](DigitClassifier::input_dim).
pub trait DigitClassifier: Send + Sync + Debug {
    /// Human-readable model name used in logs and errors.
    fn model_name(&self) -> &str;

    /// Number of features each sample must have.
    fn input_dim(&self) -> usize;

    /// Class labels in the column order of [`decision_margins`](DigitClassifier::decision_margins).
    fn class_labels(&self) -> &[i64];

    /// Predicts one discrete label per sample.
    fn classify(&self, batch: &Tensor2D) -> DigitResult<Vec<i64>>;

    /// Returns the raw, unbounded per-class decision margins, shape `(batch, classes)`.
    fn decision_margins(&self, batch: &Tensor2D) -> DigitResult<Tensor2D>;

    /// Returns labels and decision margins together.
    ///
    /// The default calls [`classify`](DigitClassifier::classify) and then
    /// [`decision_margins`](DigitClassifier::decision_margins). Backends that produce
    /// both from one forward pass should override it.
    fn classify_with_margins(&self, batch: &Tensor2D) -> DigitResult<(Vec<i64>, Tensor2D)> {
        let labels = self.classify(batch)?;
        let margins = self.decision_margins(batch)?;
        Ok((labels, margins))
    }
}
