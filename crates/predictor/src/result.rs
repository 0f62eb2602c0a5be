//! Prediction result wire format

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt::Write as _;

use feature_engine::FeatureVector;
use inference_engine::Prediction;
use serde::Serialize;

/// Successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSuccess {
    pub success: bool,
    /// 1 when the probability reaches the abnormal threshold
    pub abnormal: u8,
    pub probability: f64,
    /// Manifest length
    pub features_used: usize,
    /// Number of features the extractor produced
    pub features_available: usize,
    pub computed_features: FeatureVector,
}

/// Failed prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionFailure {
    pub success: bool,
    pub error: String,
    pub traceback: String,
}

/// Result emitted for every invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResult {
    Success(PredictionSuccess),
    Failure(PredictionFailure),
}

impl PredictionResult {
    /// Successful result from a model prediction and the features it scored
    pub fn success(prediction: &Prediction, features: FeatureVector) -> Self {
        PredictionResult::Success(PredictionSuccess {
            success: true,
            abnormal: prediction.classification.as_flag(),
            probability: prediction.probability,
            features_used: prediction.features_used,
            features_available: features.len(),
            computed_features: features,
        })
    }

    /// Failure result carrying the error chain and a stack trace
    pub fn from_error(err: &anyhow::Error) -> Self {
        let mut traceback = format!("Error: {err}");
        let mut causes = err.chain().skip(1).peekable();
        if causes.peek().is_some() {
            traceback.push_str("\n\nCaused by:");
            for (i, cause) in causes.enumerate() {
                let _ = write!(traceback, "\n    {i}: {cause}");
            }
        }
        let _ = write!(traceback, "\n\nStack backtrace:\n{}", Backtrace::force_capture());

        PredictionResult::Failure(PredictionFailure {
            success: false,
            error: format!("{err:#}"),
            traceback,
        })
    }

    /// Failure result for a panic caught at the prediction boundary
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());

        PredictionResult::Failure(PredictionFailure {
            success: false,
            error: format!("prediction panicked: {message}"),
            traceback: format!("Stack backtrace:\n{}", Backtrace::force_capture()),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResult::Success(_))
    }

    /// Error message of a failed result
    pub fn error(&self) -> Option<&str> {
        match self {
            PredictionResult::Failure(failure) => Some(&failure.error),
            PredictionResult::Success(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use feature_engine::extract_features;
    use inference_engine::Classification;

    #[test]
    fn test_success_wire_format() {
        let prediction = Prediction {
            classification: Classification::Abnormal,
            probability: 0.8,
            features_used: 43,
        };
        let result = PredictionResult::success(&prediction, extract_features(&[], None));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["abnormal"], 1);
        assert_eq!(json["probability"], 0.8);
        assert_eq!(json["features_used"], 43);
        assert_eq!(json["features_available"], 18);
        assert_eq!(json["computed_features"]["meanTapInter"], 0.0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_wire_format() {
        let err = std::fs::read("/nonexistent/model.onnx")
            .context("failed to load model")
            .unwrap_err();
        let result = PredictionResult::from_error(&err);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], false);
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("failed to load model: "));
        let traceback = json["traceback"].as_str().unwrap();
        assert!(traceback.contains("Caused by:"));
        assert!(traceback.contains("Stack backtrace:"));
        assert!(json.get("probability").is_none());
    }

    #[test]
    fn test_panic_payloads() {
        let result = PredictionResult::from_panic(Box::new("boom"));
        assert_eq!(result.error(), Some("prediction panicked: boom"));

        let result = PredictionResult::from_panic(Box::new(String::from("bang")));
        assert_eq!(result.error(), Some("prediction panicked: bang"));
        assert!(!result.is_success());
    }
}
