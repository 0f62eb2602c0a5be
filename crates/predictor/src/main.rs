//! FTT Predictor - Main Entry Point
//!
//! Reads one JSON request from stdin and writes one JSON result to stdout.

use std::io::{self, Read, Write};

use anyhow::Context;
use predictor::{init_logging, PredictionResult, Predictor, PredictorConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let result = match PredictorConfig::from_env() {
        Ok(config) => {
            init_logging(config.debug, config.log_json);
            info!("=== FTT Predictor v{} ===", env!("CARGO_PKG_VERSION"));
            run(config)
        }
        Err(err) => {
            init_logging(false, false);
            let err = anyhow::Error::new(err).context("failed to load configuration");
            PredictionResult::from_error(&err)
        }
    };

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &result).context("failed to write result")?;
    writeln!(stdout).context("failed to write result")?;
    stdout.flush().context("failed to flush result")?;
    Ok(())
}

fn run(config: PredictorConfig) -> PredictionResult {
    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        let err = anyhow::Error::new(err).context("failed to read request from stdin");
        return PredictionResult::from_error(&err);
    }

    Predictor::new(config).predict(&input)
}
