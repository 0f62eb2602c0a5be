//! Prediction pipeline

use std::panic::{self, AssertUnwindSafe};

use crate::config::PredictorConfig;
use crate::result::PredictionResult;
use anyhow::{Context, Result};
use data_validator::{TapRequest, Validator};
use feature_engine::{ExtractorConfig, FeatureExtractor};
use inference_engine::InferenceEngine;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Runs tap requests through validation, feature extraction and scoring.
///
/// Artifacts are loaded per request so an invocation always scores with
/// what is on disk.
pub struct Predictor {
    config: PredictorConfig,
    extractor: FeatureExtractor,
    validator: Validator,
}

impl Predictor {
    pub fn new(config: PredictorConfig) -> Self {
        let extractor = FeatureExtractor::new(ExtractorConfig { debug: config.debug });
        Self {
            config,
            extractor,
            validator: Validator::default(),
        }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Predict from raw JSON request text. Never fails: errors and panics
    /// become failure results.
    pub fn predict(&self, input: &str) -> PredictionResult {
        self.guarded(|| TapRequest::from_json(input).context("failed to decode tap request"))
    }

    /// Predict from an already parsed JSON request
    pub fn predict_value(&self, value: Value) -> PredictionResult {
        self.guarded(move || TapRequest::from_value(value).context("failed to decode tap request"))
    }

    fn guarded<F>(&self, decode: F) -> PredictionResult
    where
        F: FnOnce() -> Result<TapRequest>,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(decode))) {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!("Prediction failed: {:#}", err);
                PredictionResult::from_error(&err)
            }
            Err(payload) => {
                warn!("Prediction panicked");
                PredictionResult::from_panic(payload)
            }
        }
    }

    fn run<F>(&self, decode: F) -> Result<PredictionResult>
    where
        F: FnOnce() -> Result<TapRequest>,
    {
        let model_path = self.config.model_path();
        let manifest_path = self.config.manifest_path();
        let engine = InferenceEngine::load(&model_path, &manifest_path).with_context(|| {
            format!(
                "failed to load model artifacts ({}, {})",
                model_path.display(),
                manifest_path.display()
            )
        })?;

        let request = decode()?;
        self.predict_request(&engine, &request)
    }

    /// Score a decoded request with a loaded engine
    pub fn predict_request(
        &self,
        engine: &InferenceEngine,
        request: &TapRequest,
    ) -> Result<PredictionResult> {
        self.validator
            .validate(request)
            .context("invalid tap request")?;

        let features = self
            .extractor
            .extract(&request.tap_intervals, request.positions());
        debug!("Extracted {} features", features.len());

        let prediction = engine.predict(&features).context("model scoring failed")?;
        info!(
            "FTT prediction: {} (p={:.4}, {} features used)",
            prediction.classification.as_str(),
            prediction.probability,
            prediction.features_used
        );

        Ok(PredictionResult::success(&prediction, features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const TREES: &str = r#"{
        "base_score": 0.5,
        "trees": [
            { "nodeid": 0, "split": "meanTapInter", "split_condition": 200.0,
              "yes": 1, "no": 2, "missing": 1,
              "children": [ { "nodeid": 1, "leaf": -1.5 }, { "nodeid": 2, "leaf": 1.5 } ] }
        ]
    }"#;

    fn write_artifacts(dir: &Path) -> PredictorConfig {
        std::fs::write(dir.join("model.json"), TREES).unwrap();
        std::fs::write(dir.join("names.json"), r#"["meanTapInter", "numberTaps"]"#).unwrap();
        PredictorConfig::new(dir)
            .with_model_path(dir.join("model.json"))
            .with_manifest_path(dir.join("names.json"))
    }

    #[test]
    fn test_slow_tapping_is_abnormal() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::new(write_artifacts(dir.path()));

        let result = predictor.predict(r#"{"tap_intervals": [300, 320, 310]}"#);
        let PredictionResult::Success(success) = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(success.abnormal, 1);
        assert!(success.probability > 0.5);
        assert_eq!(success.features_used, 2);
    }

    #[test]
    fn test_fast_tapping_is_normal() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::new(write_artifacts(dir.path()));

        let result = predictor.predict_value(serde_json::json!({"tap_intervals": [100, 120, 110]}));
        let PredictionResult::Success(success) = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(success.abnormal, 0);
        assert!(success.probability < 0.5);
    }

    #[test]
    fn test_invalid_interval_reported() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::new(write_artifacts(dir.path()));

        let result = predictor.predict(r#"{"tap_intervals": [100, -5]}"#);
        let error = result.error().unwrap();
        assert!(error.starts_with("invalid tap request"));
    }

    #[test]
    fn test_missing_artifacts_reported_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::new(PredictorConfig::new(dir.path()));

        let result = predictor.predict("not json");
        let error = result.error().unwrap();
        assert!(error.contains("failed to load model artifacts"));
        assert!(error.contains("feature_names.json"));
    }
}
