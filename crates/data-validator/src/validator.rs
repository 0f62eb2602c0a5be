//! Tap Request Range Checking

use crate::error::ValidationError;
use crate::request::TapRequest;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Tap interval valid range (ms)
    pub interval_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            interval_range: (0.0, f64::INFINITY),
        }
    }
}

/// Validator for decoded tap requests
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        index: usize,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        // NaN fails both comparisons and infinity passes an open upper bound
        if !value.is_finite() || value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                index,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate every interval and coordinate of a request
    pub fn validate(&self, request: &TapRequest) -> Result<(), ValidationError> {
        for (index, &interval) in request.tap_intervals.iter().enumerate() {
            self.validate_range("tap_intervals", index, interval, self.config.interval_range)?;
        }

        for (index, pos) in request.positions().unwrap_or_default().iter().enumerate() {
            if !pos.x.is_finite() {
                return Err(ValidationError::NonFiniteCoordinate { axis: "x", index });
            }
            if !pos.y.is_finite() {
                return Err(ValidationError::NonFiniteCoordinate { axis: "y", index });
            }
        }

        debug!(
            "Validated request: {} intervals, {} positions",
            request.tap_intervals.len(),
            request.positions().map_or(0, |p| p.len())
        );
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
