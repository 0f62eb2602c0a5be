//! Predictor configuration

use std::path::{Path, PathBuf};

use crate::PredictorError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Default model artifact name inside the base directory
pub const DEFAULT_MODEL_FILE: &str = "xgb_ftt_model.onnx";

/// Default feature manifest name inside the base directory
pub const DEFAULT_MANIFEST_FILE: &str = "feature_names.json";

/// Base directory when the caller supplies none: the working directory
pub const DEFAULT_BASE_DIR: &str = ".";

/// Environment variable prefix (`FTT_DEBUG`, `FTT_MODEL_PATH`, ...)
pub const ENV_PREFIX: &str = "FTT";

/// Predictor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Directory holding the default artifacts
    pub base_dir: PathBuf,

    /// Model artifact override
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Feature manifest override
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,

    /// Emit extractor diagnostics and debug-level logs
    #[serde(default)]
    pub debug: bool,

    /// Write logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

impl PredictorConfig {
    /// Create a config resolving artifacts inside `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            model_path: None,
            manifest_path: None,
            debug: false,
            log_json: false,
        }
    }

    /// Override the model artifact location
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Override the feature manifest location
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Enable or disable diagnostics
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Resolved model artifact path
    pub fn model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_MODEL_FILE))
    }

    /// Resolved feature manifest path
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_MANIFEST_FILE))
    }

    /// Load configuration for the binary: defaults, then the file named by
    /// `FTT_CONFIG` if set, then `FTT_*` environment variables.
    pub fn from_env() -> Result<Self, PredictorError> {
        let file = std::env::var_os("FTT_CONFIG").map(PathBuf::from);
        Self::load(
            PathBuf::from(DEFAULT_BASE_DIR),
            file.as_deref(),
            Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    /// Layer an optional config file and an environment source over the
    /// defaults
    pub fn load(
        base_dir: PathBuf,
        file: Option<&Path>,
        env: Environment,
    ) -> Result<Self, PredictorError> {
        let mut builder = Config::builder()
            .set_default("base_dir", base_dir.to_string_lossy().into_owned())?
            .set_default("debug", false)?
            .set_default("log_json", false)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        Ok(config)
    }
}
