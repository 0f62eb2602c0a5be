//! Tap Request Decoding

use crate::error::ValidationError;
use feature_engine::TapPosition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded tap test request.
///
/// Deserializing goes through [`TapRequest::from_value`], so serde callers
/// get the same coercion rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct TapRequest {
    /// Milliseconds between consecutive taps
    pub tap_intervals: Vec<f64>,
    /// Optional per-tap screen coordinates
    pub tap_positions: Option<Vec<TapPosition>>,
}

impl TapRequest {
    /// Decode a request from raw JSON text
    pub fn from_json(input: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decode a request from a parsed JSON value.
    ///
    /// Intervals may be numbers or numeric strings; a missing interval list
    /// decodes as empty and a missing or null position list as absent.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut fields) = value else {
            return Err(ValidationError::InvalidFormat(
                "request must be a JSON object".to_string(),
            ));
        };

        let tap_intervals = match fields.remove("tap_intervals") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| coerce_interval(index, item))
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(ValidationError::InvalidFormat(format!(
                    "tap_intervals must be an array, got {other}"
                )))
            }
        };

        let tap_positions = match fields.remove("tap_positions") {
            None | Some(Value::Null) => None,
            Some(positions @ Value::Array(_)) => Some(
                serde_json::from_value::<Vec<TapPosition>>(positions)
                    .map_err(|e| ValidationError::InvalidFormat(format!("tap_positions: {e}")))?,
            ),
            Some(other) => {
                return Err(ValidationError::InvalidFormat(format!(
                    "tap_positions must be an array, got {other}"
                )))
            }
        };

        Ok(Self {
            tap_intervals,
            tap_positions,
        })
    }

    /// Positions as a slice, if any were supplied
    pub fn positions(&self) -> Option<&[TapPosition]> {
        self.tap_positions.as_deref()
    }
}

impl TryFrom<Value> for TapRequest {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn coerce_interval(index: usize, item: &Value) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidInterval {
        index,
        value: item.to_string(),
    };

    match item {
        Value::Number(n) => n.as_f64().ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_intervals() {
        let request = TapRequest::from_json(r#"{"tap_intervals": [120, 135.5, 0]}"#).unwrap();
        assert_eq!(request.tap_intervals, vec![120.0, 135.5, 0.0]);
        assert!(request.positions().is_none());
    }

    #[test]
    fn test_string_intervals_are_coerced() {
        let request = TapRequest::from_value(json!({"tap_intervals": ["120", " 98.25 ", 101]})).unwrap();
        assert_eq!(request.tap_intervals, vec![120.0, 98.25, 101.0]);
    }

    #[test]
    fn test_serde_decoding_matches_from_value() {
        let raw = r#"{"tap_intervals": ["120", 98.25], "tap_positions": [{"x": 1, "y": 2}]}"#;
        let decoded: TapRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded, TapRequest::from_json(raw).unwrap());
        assert_eq!(decoded.tap_intervals, vec![120.0, 98.25]);

        let err = serde_json::from_str::<TapRequest>(r#"{"tap_intervals": ["fast"]}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid tap interval at index 0"));
    }

    #[test]
    fn test_unparseable_string_interval() {
        let err = TapRequest::from_value(json!({"tap_intervals": ["120", "fast"]})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidInterval { index: 1, .. }));
    }

    #[test]
    fn test_wrong_interval_type() {
        let err = TapRequest::from_value(json!({"tap_intervals": [true]})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidInterval { index: 0, .. }));

        let err = TapRequest::from_value(json!({"tap_intervals": "120,130"})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_fields_default() {
        let request = TapRequest::from_value(json!({})).unwrap();
        assert!(request.tap_intervals.is_empty());
        assert!(request.tap_positions.is_none());

        let request = TapRequest::from_value(json!({"tap_intervals": [], "tap_positions": null})).unwrap();
        assert!(request.tap_positions.is_none());
    }

    #[test]
    fn test_positions_decoded() {
        let request = TapRequest::from_value(json!({
            "tap_intervals": [100, 110],
            "tap_positions": [{"x": 10, "y": 20.5}, {"x": 11}]
        }))
        .unwrap();
        assert_eq!(
            request.positions(),
            Some(&[TapPosition::new(10.0, 20.5), TapPosition::new(11.0, 0.0)][..])
        );
    }

    #[test]
    fn test_bad_positions() {
        let err = TapRequest::from_value(json!({"tap_positions": [{"x": "left"}]})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat(_)));

        let err = TapRequest::from_value(json!({"tap_positions": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = TapRequest::from_json("{\"tap_intervals\": [1, 2").unwrap_err();
        assert!(matches!(err, ValidationError::MalformedJson(_)));

        let err = TapRequest::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat(_)));
    }
}
