//! Tracing setup.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives (default: `strategy_harness=info`)
//! - `HARNESS_LOG_ANSI`: set to `false` to disable coloured output

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "strategy_harness=info";

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global console subscriber.
///
/// Returns false if a subscriber was already installed.
pub fn init_tracing() -> bool {
    let ansi = std::env::var("HARNESS_LOG_ANSI").map_or(true, |v| v != "false");

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_ansi(ansi)
        .try_init()
        .is_ok()
}
