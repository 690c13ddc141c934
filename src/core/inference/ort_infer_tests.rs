use super::*;
use super::ort_infer_execution::assemble_outputs;

#[test]
fn test_new_fails_for_missing_model() {
    let result = OrtInfer::new("dummy_path.onnx", None, None, None, None);
    assert!(matches!(result, Err(DigitError::ModelLoad { .. })));
}

#[test]
fn test_default_output_names_match_skl2onnx() {
    assert_eq!(DEFAULT_LABEL_OUTPUT, "label");
    assert_eq!(DEFAULT_MARGIN_OUTPUT, "probabilities");
}

const NAMES: (&str, &str) = (DEFAULT_LABEL_OUTPUT, DEFAULT_MARGIN_OUTPUT);

#[test]
fn test_assemble_outputs_single_sample() {
    let scores: Vec<f32> = (0..10).map(|i| i as f32 - 4.5).collect();
    let outputs = assemble_outputs("svm", NAMES, 1, &[7], &[1, 10], &scores).unwrap();
    assert_eq!(outputs.labels, vec![7]);
    assert_eq!(outputs.margins.shape(), &[1, 10]);
    assert_eq!(outputs.margins[[0, 9]], 4.5);
}

#[test]
fn test_assemble_outputs_label_count_mismatch() {
    let err = assemble_outputs("svm", NAMES, 1, &[3, 4], &[1, 2], &[0.0, 1.0]).unwrap_err();
    assert!(err.is_inference());
    assert!(err.to_string().contains("'label'"), "{err}");
}

#[test]
fn test_assemble_outputs_rejects_flat_scores() {
    let err = assemble_outputs("svm", NAMES, 1, &[3], &[10], &[0.0; 10]).unwrap_err();
    assert!(err.is_inference());
    assert!(err.to_string().contains("'probabilities'"), "{err}");
}

#[test]
fn test_assemble_outputs_rejects_batch_mismatch() {
    let err = assemble_outputs("svm", NAMES, 1, &[3], &[2, 5], &[0.0; 10]).unwrap_err();
    assert!(err.is_inference());
}

#[test]
fn test_assemble_outputs_rejects_short_score_buffer() {
    let err = assemble_outputs("svm", NAMES, 1, &[3], &[1, 10], &[0.0; 9]).unwrap_err();
    match err {
        DigitError::Inference { model_name, .. } => assert_eq!(model_name, "svm"),
        other => panic!("unexpected error: {other:?}"),
    }
}
