//! Feature Manifest
//!
//! Ordered list of feature names the classifier was trained on. The order
//! defines the column layout of every scoring row.

use std::fs;
use std::path::Path;

use crate::InferenceError;
use feature_engine::{FeatureName, FeatureVector};
use tracing::{debug, info};

/// Ordered feature schema expected by a scoring model
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureManifest {
    names: Vec<String>,
}

impl FeatureManifest {
    /// Load a manifest from a JSON array of feature names
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            InferenceError::ManifestLoad(format!("{}: {}", path.display(), e))
        })?;
        let names: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            InferenceError::ManifestLoad(format!("{}: {}", path.display(), e))
        })?;

        let manifest = Self::from_names(names)?;
        info!("Loaded feature manifest with {} features from {}", manifest.len(), path.display());
        Ok(manifest)
    }

    /// Build a manifest from feature names in column order
    pub fn from_names<I, S>(names: I) -> Result<Self, InferenceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(InferenceError::ManifestLoad(
                "feature manifest is empty".to_string(),
            ));
        }

        let manifest = Self { names };
        for name in manifest.unknown_names() {
            debug!("Manifest feature '{}' is not produced by the extractor", name);
        }
        Ok(manifest)
    }

    /// Feature names in column order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column index of a feature name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Manifest names outside the extractor vocabulary
    pub fn unknown_names(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|n| n.parse::<FeatureName>().is_err())
    }

    /// Build a scoring row in manifest order.
    ///
    /// Features the vector lacks are filled with 0, features outside the
    /// manifest are dropped and non-finite values are replaced by 0.
    pub fn align(&self, features: &FeatureVector) -> Vec<f64> {
        self.names
            .iter()
            .map(|name| match features.get_by_name(name) {
                Some(v) if v.is_finite() => v,
                _ => 0.0,
            })
            .collect()
    }
}
