//! Finger Tapping Test Predictor
//!
//! Reads a tap request, extracts the FTT feature set, scores it with the
//! trained classifier and reports the outcome as a JSON result.

mod config;
mod predictor;
mod result;

pub use crate::config::{
    PredictorConfig, DEFAULT_BASE_DIR, DEFAULT_MANIFEST_FILE, DEFAULT_MODEL_FILE, ENV_PREFIX,
};
pub use crate::predictor::Predictor;
pub use crate::result::{PredictionFailure, PredictionResult, PredictionSuccess};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Predictor setup errors
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

/// Initialize logging on stderr; stdout carries only the result.
///
/// `RUST_LOG` takes precedence over the debug switch.
pub fn init_logging(debug: bool, json: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    // A subscriber may already be installed (tests, embedding callers)
    let _ = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
}
