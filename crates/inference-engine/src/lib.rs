//! Tap Test Inference Engine
//!
//! Scores extracted tap features with a pre-trained binary classifier:
//! an ONNX model run through tract, or a gradient-boosted tree dump.

mod engine;
mod manifest;
mod model;
mod onnx;
mod tree;

pub use engine::{Classification, InferenceEngine, Prediction, ABNORMAL_THRESHOLD};
pub use manifest::FeatureManifest;
pub use model::{load_model, ScoringModel};
pub use onnx::OnnxClassifier;
pub use tree::TreeEnsemble;

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoad(String),
    #[error("Feature manifest load failed: {0}")]
    ManifestLoad(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Model returned probability {0} outside [0, 1]")]
    InvalidProbability(f64),
}
