//! Tap Feature Engine
//!
//! Turns finger-tap interval series and optional tap positions into the
//! named feature vector consumed by the abnormality classifier. Pure
//! computation: no I/O and no shared state.

mod features;
mod position;
mod signal;
mod statistics;

pub use features::{
    extract_features, ExtractorConfig, FeatureExtractor, FeatureName, FeatureVector,
    UnknownFeature, FEATURE_COUNT,
};
pub use position::{drift, pearson, TapPosition};
pub use signal::{autocorrelation, detrended_fluctuation, fatigue, teager_kaiser_energy};
pub use statistics::{percentile, DescriptiveStats};
