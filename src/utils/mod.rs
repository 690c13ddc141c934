//! Utility functions for the recognition pipeline.
//!
//! This module provides image decoding helpers used by the normalizer and the
//! end-to-end predictor.

pub mod image;

pub use image::{dynamic_to_gray, load_image, load_image_from_memory};
