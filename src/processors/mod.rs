//! Image processing for digit recognition.
//!
//! This module turns decoded images into the canonical form the classifier expects.
//!
//! # Modules
//!
//! * `normalization` - The canonical form normalizer (grayscale, polarity, padding,
//!   resampling, flattening)
//! * `polarity` - Background polarity detection from border samples
//! * `types` - The canonical tensor and polarity label
//! * `utils` - Grayscale image helpers shared by the stages

mod normalization;
pub mod polarity;
pub mod types;
pub mod utils;

pub use normalization::CanonicalFormNormalizer;
pub use polarity::BackgroundPolarityDetector;
pub use types::{CanonicalTensor, Polarity};
