//! Inference Engine Implementation

use std::path::Path;

use crate::manifest::FeatureManifest;
use crate::model::{load_model, ScoringModel};
use crate::InferenceError;
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Probability at or above which a session is classified abnormal
pub const ABNORMAL_THRESHOLD: f64 = 0.5;

/// Outcome class of a tapping session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Normal,
    Abnormal,
}

impl Classification {
    /// Classify a positive-class probability
    pub fn from_probability(probability: f64) -> Self {
        if probability >= ABNORMAL_THRESHOLD {
            Classification::Abnormal
        } else {
            Classification::Normal
        }
    }

    /// 0/1 flag as reported to callers
    pub fn as_flag(&self) -> u8 {
        match self {
            Classification::Normal => 0,
            Classification::Abnormal => 1,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Normal => "normal",
            Classification::Abnormal => "abnormal",
        }
    }
}

/// Prediction result from inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Thresholded class
    pub classification: Classification,
    /// Probability of the abnormal class (0.0 to 1.0)
    pub probability: f64,
    /// Number of columns scored (manifest length)
    pub features_used: usize,
}

/// Scoring model paired with the feature schema it was trained on
pub struct InferenceEngine {
    model: Box<dyn ScoringModel>,
    manifest: FeatureManifest,
}

impl InferenceEngine {
    /// Create an engine from an already loaded model and manifest
    pub fn new(model: Box<dyn ScoringModel>, manifest: FeatureManifest) -> Result<Self, InferenceError> {
        if model.input_width() != manifest.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", manifest.len()),
                actual: format!("[1, {}]", model.input_width()),
            });
        }
        Ok(Self { model, manifest })
    }

    /// Load the manifest, then the model laid out against it
    pub fn load(model_path: &Path, manifest_path: &Path) -> Result<Self, InferenceError> {
        let manifest = FeatureManifest::load(manifest_path)?;
        let model = load_model(model_path, &manifest)?;
        info!(
            "Inference engine ready: {} model, {} features",
            model.kind(),
            manifest.len()
        );
        Self::new(model, manifest)
    }

    /// Score a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let row = self.manifest.align(features);
        debug!("Scoring row of {} columns", row.len());

        let probability = self.model.predict_proba(&row)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::InvalidProbability(probability));
        }

        let classification = Classification::from_probability(probability);
        debug!(
            "Prediction: {} (p={:.4})",
            classification.as_str(),
            probability
        );

        Ok(Prediction {
            classification,
            probability,
            features_used: self.manifest.len(),
        })
    }

    /// Feature schema the model expects
    pub fn manifest(&self) -> &FeatureManifest {
        &self.manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::extract_features;

    /// Returns a fixed probability regardless of input
    struct ConstantModel {
        probability: f64,
        width: usize,
    }

    impl ScoringModel for ConstantModel {
        fn predict_proba(&self, _row: &[f64]) -> Result<f64, InferenceError> {
            Ok(self.probability)
        }

        fn input_width(&self) -> usize {
            self.width
        }

        fn kind(&self) -> &'static str {
            "constant"
        }
    }

    fn engine(probability: f64) -> InferenceEngine {
        let manifest = FeatureManifest::from_names(["meanTapInter", "sdTapInter", "corXY"]).unwrap();
        InferenceEngine::new(Box::new(ConstantModel { probability, width: 3 }), manifest).unwrap()
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let features = extract_features(&[100.0, 120.0, 110.0], None);

        let result = engine(0.5).predict(&features).unwrap();
        assert_eq!(result.classification, Classification::Abnormal);
        assert_eq!(result.classification.as_flag(), 1);

        let result = engine(0.4999).predict(&features).unwrap();
        assert_eq!(result.classification, Classification::Normal);
        assert_eq!(result.features_used, 3);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let features = extract_features(&[100.0, 120.0], None);
        for p in [1.5, -0.1, f64::NAN] {
            assert!(matches!(
                engine(p).predict(&features),
                Err(InferenceError::InvalidProbability(_))
            ));
        }
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let manifest = FeatureManifest::from_names(["meanTapInter"]).unwrap();
        let model = Box::new(ConstantModel { probability: 0.1, width: 5 });
        assert!(matches!(
            InferenceEngine::new(model, manifest),
            Err(InferenceError::InvalidInputShape { .. })
        ));
    }
}
