use super::*;
use crate::core::errors::SimpleError;
use ndarray::ArrayView2;
use ort::value::TensorRef;

impl OrtInfer {
    /// Runs one forward pass and extracts both the label and the score outputs.
    pub fn infer(&self, x: &Tensor2D) -> Result<ClassifierOutputs, DigitError> {
        let input_shape = x.shape().to_vec();
        let batch_size = input_shape[0];

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            DigitError::inference(
                &self.model_name,
                format!("failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session_guard = self.session.lock().map_err(|_| {
            DigitError::inference(
                &self.model_name,
                "failed to acquire session lock",
                SimpleError::new("session mutex poisoned"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            DigitError::inference(
                &self.model_name,
                format!(
                    "ONNX Runtime forward pass failed for input '{}' with shape {:?}",
                    self.input_name, input_shape
                ),
                e,
            )
        })?;

        let (_, label_data) = outputs[self.label_output.as_str()]
            .try_extract_tensor::<i64>()
            .map_err(|e| {
                DigitError::inference(
                    &self.model_name,
                    format!("failed to extract output '{}' as int64", self.label_output),
                    e,
                )
            })?;

        let (margin_shape, margin_data) = outputs[self.margin_output.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                DigitError::inference(
                    &self.model_name,
                    format!(
                        "failed to extract output '{}' as a float tensor (export with zipmap disabled)",
                        self.margin_output
                    ),
                    e,
                )
            })?;

        assemble_outputs(
            &self.model_name,
            (self.label_output.as_str(), self.margin_output.as_str()),
            batch_size,
            label_data,
            margin_shape,
            margin_data,
        )
    }
}

/// Checks extracted label and score tensors against the batch size and copies them out.
///
/// Labels must hold exactly one value per sample; scores must be 2-D with one row per
/// sample.
pub(super) fn assemble_outputs(
    model_name: &str,
    (label_output, margin_output): (&str, &str),
    batch_size: usize,
    labels: &[i64],
    margin_shape: &[i64],
    margins: &[f32],
) -> Result<ClassifierOutputs, DigitError> {
    if labels.len() != batch_size {
        return Err(DigitError::inference_msg(
            model_name,
            format!(
                "label output '{}' has {} values, expected {} labels",
                label_output,
                labels.len(),
                batch_size
            ),
        ));
    }

    let dims: Option<Vec<usize>> = margin_shape
        .iter()
        .map(|&d| usize::try_from(d).ok())
        .collect();
    let num_classes = match dims.as_deref() {
        Some(&[rows, classes]) if rows == batch_size => classes,
        _ => {
            return Err(DigitError::inference_msg(
                model_name,
                format!(
                    "score output '{}' has shape {:?}, expected ({}, classes)",
                    margin_output, margin_shape, batch_size
                ),
            ));
        }
    };

    let margins = ArrayView2::from_shape((batch_size, num_classes), margins)
        .map_err(|e| DigitError::inference(model_name, "score output size mismatch", e))?
        .to_owned();

    Ok(ClassifierOutputs {
        labels: labels.to_vec(),
        margins,
    })
}
