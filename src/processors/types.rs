//! Types produced by the normalization pipeline.

use crate::core::batch::Tensor2D;
use crate::core::errors::{DigitError, DigitResult, ProcessingStage};

/// Background polarity of a grayscale image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Light background with dark strokes (e.g. ink on paper).
    LightBackground,
    /// Dark background with light strokes, the classifier's training convention.
    DarkBackground,
}

impl Polarity {
    /// Whether intensities must be inverted to reach the dark-background convention.
    pub fn needs_inversion(self) -> bool {
        matches!(self, Polarity::LightBackground)
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::LightBackground => write!(f, "light background"),
            Polarity::DarkBackground => write!(f, "dark background"),
        }
    }
}

/// The fixed-length input the classifier accepts.
///
/// A row-major flattening of a `width x height` dark-background image with
/// intensities in `[0.0, 1.0]`. Created fresh for every prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTensor {
    values: Vec<f32>,
    width: u32,
    height: u32,
}

impl CanonicalTensor {
    /// Wraps flattened values, checking that their count matches `width * height`.
    pub fn new(values: Vec<f32>, width: u32, height: u32) -> DigitResult<Self> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(DigitError::preprocessing_msg(
                ProcessingStage::Flatten,
                format!(
                    "expected {} values for a {}x{} tensor, got {}",
                    expected,
                    width,
                    height,
                    values.len()
                ),
            ));
        }
        Ok(Self {
            values,
            width,
            height,
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Width of the image the tensor was flattened from.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image the tensor was flattened from.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The flattened values in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Mean intensity, `0.0` for an empty tensor.
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    /// Reshapes into a single-sample batch of shape `(1, len)`.
    pub fn to_batch(&self) -> Result<Tensor2D, ndarray::ShapeError> {
        Tensor2D::from_shape_vec((1, self.values.len()), self.values.clone())
    }

    /// Consumes the tensor and returns its values.
    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = CanonicalTensor::new(vec![0.0; 10], 28, 28).unwrap_err();
        assert!(matches!(
            err,
            DigitError::Preprocessing {
                stage: ProcessingStage::Flatten,
                ..
            }
        ));
    }

    #[test]
    fn test_row_major_indexing() {
        let tensor = CanonicalTensor::new(vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5], 3, 2).unwrap();
        assert_eq!(tensor.get(2, 0), Some(0.2));
        assert_eq!(tensor.get(0, 1), Some(0.3));
        assert_eq!(tensor.get(3, 0), None);
    }

    #[test]
    fn test_to_batch_shape() {
        let tensor = CanonicalTensor::new(vec![0.5; 784], 28, 28).unwrap();
        let batch = tensor.to_batch().unwrap();
        assert_eq!(batch.shape(), &[1, 784]);
        assert!((tensor.mean() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_polarity_inversion() {
        assert!(Polarity::LightBackground.needs_inversion());
        assert!(!Polarity::DarkBackground.needs_inversion());
    }
}
