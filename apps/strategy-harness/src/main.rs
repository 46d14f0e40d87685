//! Strategy Harness Binary
//!
//! Replays a recorded event stream through the strategy and prints the run
//! summary.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin strategy-harness -- [config.yaml]
//! ```
//!
//! # Environment Variables
//!
//! - `HARNESS_CONFIG`: config file path, used when no argument is given
//!   (default: config.yaml)
//! - `RUST_LOG`: log filter (default: strategy_harness=info)

use std::process::ExitCode;

use anyhow::Context;
use strategy_harness::config::{DEFAULT_CONFIG_PATH, load_config};
use strategy_harness::telemetry::init_tracing;
use strategy_harness::{ReplaySource, RunSummary, Strategy};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(summary) => {
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!(error = %e, "Failed to render run summary"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "Strategy harness failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<RunSummary> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HARNESS_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    tracing::info!(config = %config_path, "Starting strategy harness");

    let config = load_config(Some(&config_path))
        .with_context(|| format!("loading configuration from {config_path}"))?;

    let source = ReplaySource::from_path(config.replay.source_config(), &config.replay.events_path)
        .with_context(|| {
            format!(
                "loading events from {}",
                config.replay.events_path.display()
            )
        })?;

    let mut strategy = Strategy::from_config(&config, source)?;
    if let Some(journal) = strategy.journal() {
        tracing::info!(path = %journal.path().display(), "Writing event journal");
    }

    Ok(strategy.run()?)
}
