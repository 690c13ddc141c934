//! Digit Prediction Command
//!
//! Predicts the handwritten digit in a single image and prints the result as JSON on
//! stdout. Logs go to stderr and are controlled with `RUST_LOG`.
//!
//! Usage:
//! ```
//! predict_digit --model-path <path_to_model> <image_path>
//! ```
//!
//! On success the output is `{"digit": 7, "confidence": 0.93}`. On failure it is
//! `{"error": "..."}` and the exit status is 1.

use clap::Parser;
use digit_recognizer::core::{DigitError, DigitResult, PipelineConfig, init_tracing};
use digit_recognizer::models::load_classifier;
use digit_recognizer::predictor::{DigitPredictor, PredictionResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Command-line arguments for digit prediction
#[derive(Parser)]
#[command(name = "predict_digit")]
#[command(about = "Predicts the handwritten digit in an image")]
struct Args {
    /// Image file to classify
    image: PathBuf,

    /// Path to the model file (.onnx or .json); overrides the configuration file
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// JSON pipeline configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reject files outside the configured size limits or without a PNG/JPEG signature
    #[arg(long)]
    strict_input: bool,
}

fn run(args: &Args) -> DigitResult<PredictionResult> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    let model_path = args
        .model_path
        .clone()
        .or_else(|| config.model.model_path.clone())
        .ok_or_else(|| {
            DigitError::config_error("no model given: pass --model-path or set model.model_path")
        })?;

    info!("Loading model: {}", model_path.display());
    let classifier = load_classifier(&model_path, &config.model)?;

    let mut builder = DigitPredictor::builder(classifier).pipeline_config(&config);
    if args.strict_input {
        builder = builder.input_limits(config.input);
    }
    let predictor = builder.build()?;

    info!("Processing image: {}", args.image.display());
    predictor.predict_path(&args.image)
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(result) => match serde_json::to_string(&result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to serialize result: {e}");
                println!("{}", serde_json::json!({ "error": e.to_string() }));
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("Prediction failed: {e}");
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}
