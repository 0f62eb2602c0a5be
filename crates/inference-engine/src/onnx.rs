//! ONNX Classifier via tract
//!
//! Expects a binary classifier exported without a ZipMap, taking a single
//! `float[1, width]` input and producing class probabilities as its last
//! output (`[1, 2]`, or `[1]` holding the positive class only).

use std::path::Path;

use crate::model::ScoringModel;
use crate::InferenceError;
use tract_onnx::prelude::*;
use tracing::{debug, info};

/// Runnable ONNX binary classifier
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    width: usize,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model with a fixed `[1, width]` input
    pub fn load(path: &Path, width: usize) -> Result<Self, InferenceError> {
        info!("Loading ONNX model from {} (width={})", path.display(), width);

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, width]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoad(format!("{}: {:#}", path.display(), e)))?;

        info!("Model loaded successfully");
        Ok(Self { plan, width })
    }
}

impl ScoringModel for OnnxClassifier {
    fn predict_proba(&self, row: &[f64]) -> Result<f64, InferenceError> {
        if row.len() != self.width {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", self.width),
                actual: format!("[1, {}]", row.len()),
            });
        }

        let data: Vec<f32> = row.iter().map(|&v| v as f32).collect();
        let input = Tensor::from_shape(&[1, self.width], &data)
            .map_err(|e| InferenceError::InferenceFailed(format!("{e:#}")))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(format!("{e:#}")))?;
        debug!("ONNX model produced {} outputs", outputs.len());

        let probabilities = outputs
            .last()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".to_string()))?;
        positive_class(probabilities)
    }

    fn input_width(&self) -> usize {
        self.width
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

/// Read the positive-class probability out of a probability tensor
fn positive_class(tensor: &Tensor) -> Result<f64, InferenceError> {
    let values = tensor
        .cast_to::<f64>()
        .and_then(|t| Ok(t.as_slice::<f64>()?.to_vec()))
        .map_err(|e| InferenceError::InferenceFailed(format!("{e:#}")))?;

    match (tensor.shape(), values.as_slice()) {
        ([1, 2], [_, p]) | ([2], [_, p]) => Ok(*p),
        ([1, 1], [p]) | ([1], [p]) | ([], [p]) => Ok(*p),
        (shape, _) => Err(InferenceError::InferenceFailed(format!(
            "unexpected probability output shape {shape:?}"
        ))),
    }
}
