//! Scoring Model Abstraction

use std::path::Path;

use crate::manifest::FeatureManifest;
use crate::onnx::OnnxClassifier;
use crate::tree::TreeEnsemble;
use crate::InferenceError;

/// Binary classifier scoring one feature row at a time
pub trait ScoringModel: Send + Sync {
    /// Probability of the positive (abnormal) class for a row laid out in
    /// manifest order
    fn predict_proba(&self, row: &[f64]) -> Result<f64, InferenceError>;

    /// Number of columns the model expects
    fn input_width(&self) -> usize;

    /// Short model family name for logs
    fn kind(&self) -> &'static str;
}

/// Load a scoring model, picking the format from the file extension.
///
/// `.onnx` files run through tract; `.json` files are gradient-boosted
/// tree dumps.
pub fn load_model(
    path: &Path,
    manifest: &FeatureManifest,
) -> Result<Box<dyn ScoringModel>, InferenceError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("onnx") => Ok(Box::new(OnnxClassifier::load(path, manifest.len())?)),
        Some("json") => Ok(Box::new(TreeEnsemble::load(path, manifest)?)),
        _ => Err(InferenceError::ModelLoad(format!(
            "{}: unsupported model format (expected .onnx or .json)",
            path.display()
        ))),
    }
}
