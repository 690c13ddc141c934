//! Utility functions for image processing operations.
//!
//! - `image_utils`: inversion, size bounding, square padding and resizing of
//!   grayscale images

pub mod image_utils;

pub use image_utils::{downscale_to_fit, invert_gray, pad_to_square, resize_gray_image};
