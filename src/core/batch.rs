//! Tensor aliases used at the classifier boundary.

/// A 2-dimensional tensor of f32 values, laid out as `(batch, features)`.
pub type Tensor2D = ndarray::Array2<f32>;
