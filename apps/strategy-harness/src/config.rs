//! Configuration loading for the strategy harness.
//!
//! Configuration is read once at startup and is immutable for the run.
//! Every section has defaults matching the reference run, so a partial file
//! (or an empty one) is valid.
//!
//! ```yaml
//! strategy:
//!   max_position: "10000"
//!   order_lifetime_ns: 100000000
//! quoting:
//!   quote_size: "0.001"
//!   submission_delay_ns: 20
//!   skip_if_side_outstanding: false
//!   seed: 42
//! journal:
//!   directory: "output/logs"
//! replay:
//!   events_path: "${HARNESS_EVENTS:-data/events.jsonl}"
//!   ack_latency_ns: 10000000
//! ```
//!
//! Values may reference environment variables with `${VAR}` or
//! `${VAR:-default}`.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Nanos;
use crate::policy::QuotePolicyConfig;
use crate::source::ReplaySourceConfig;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Risk and lifetime parameters.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Quoting policy parameters.
    #[serde(default)]
    pub quoting: QuotePolicyConfig,
    /// Event journal location.
    #[serde(default)]
    pub journal: JournalConfig,
    /// Replay source used by the binary.
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// Risk and lifetime parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Maximum absolute position in quote-asset units.
    pub max_position: Decimal,
    /// Order lifetime in nanoseconds.
    pub order_lifetime_ns: Nanos,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            max_position: Decimal::new(10_000, 0),
            order_lifetime_ns: 100_000_000,
        }
    }
}

/// Event journal location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Directory receiving one journal file per run.
    pub directory: PathBuf,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output/logs"),
        }
    }
}

/// Replay source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Recorded event stream, one JSON event per line.
    pub events_path: PathBuf,
    /// Acknowledgement latency of the stub exchange (nanoseconds).
    pub ack_latency_ns: Nanos,
}

impl ReplayConfig {
    /// Settings for the replay stub.
    #[must_use]
    pub fn source_config(&self) -> ReplaySourceConfig {
        ReplaySourceConfig {
            ack_latency_ns: self.ack_latency_ns,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            events_path: PathBuf::from("data/events.jsonl"),
            ack_latency_ns: ReplaySourceConfig::default().ack_latency_ns,
        }
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<HarnessConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<HarnessConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: HarnessConfig = if interpolated.trim().is_empty() {
        HarnessConfig::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. An unset or empty
/// variable without a default becomes the empty string.
#[allow(clippy::expect_used)] // Regex is a constant pattern
fn interpolate_env_vars(input: &str) -> String {
    static ENV_VAR_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &HarnessConfig) -> Result<(), ConfigError> {
    if config.strategy.max_position <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "strategy.max_position must be positive".to_string(),
        ));
    }

    if config.strategy.order_lifetime_ns == 0 {
        return Err(ConfigError::ValidationError(
            "strategy.order_lifetime_ns must be positive".to_string(),
        ));
    }

    if config.quoting.quote_size <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "quoting.quote_size must be positive".to_string(),
        ));
    }

    if config.journal.directory.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "journal.directory must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = load_config_from_string("").unwrap();

        assert_eq!(config.strategy.max_position, dec!(10000));
        assert_eq!(config.strategy.order_lifetime_ns, 100_000_000);
        assert_eq!(config.quoting.quote_size, dec!(0.001));
        assert_eq!(config.quoting.submission_delay_ns, 20);
        assert!(!config.quoting.skip_if_side_outstanding);
        assert_eq!(config.quoting.seed, None);
        assert_eq!(config.replay.ack_latency_ns, 10_000_000);
        assert_eq!(config.journal.directory, PathBuf::from("output/logs"));
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
strategy:
  max_position: "250.5"
  order_lifetime_ns: 5000
quoting:
  quote_size: "0.01"
  submission_delay_ns: 7
  skip_if_side_outstanding: true
  seed: 42
journal:
  directory: "/tmp/journal"
replay:
  events_path: "events.jsonl"
  ack_latency_ns: 3
"#;
        let config = load_config_from_string(yaml).unwrap();

        assert_eq!(config.strategy.max_position, dec!(250.5));
        assert_eq!(config.strategy.order_lifetime_ns, 5000);
        assert_eq!(config.quoting.quote_size, dec!(0.01));
        assert!(config.quoting.skip_if_side_outstanding);
        assert_eq!(config.quoting.seed, Some(42));
        assert_eq!(config.replay.source_config().ack_latency_ns, 3);
        assert_eq!(config.replay.events_path, PathBuf::from("events.jsonl"));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let yaml = r"
strategy:
  order_lifetime_ns: 42
";
        let config = load_config_from_string(yaml).unwrap();

        assert_eq!(config.strategy.order_lifetime_ns, 42);
        assert_eq!(config.strategy.max_position, dec!(10000));
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "dir: ${HARNESS_CONFIG_TEST_NONEXISTENT_VAR:-output/logs}";
        assert_eq!(interpolate_env_vars(input), "dir: output/logs");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "events_path: ${HARNESS_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "events_path: ");
    }

    #[test]
    fn test_validation_rejects_zero_lifetime() {
        let yaml = r"
strategy:
  order_lifetime_ns: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected validation error");
        };
        assert!(err.to_string().contains("order_lifetime_ns"));
    }

    #[test]
    fn test_validation_rejects_non_positive_size() {
        let yaml = r#"
quoting:
  quote_size: "0"
"#;
        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        assert!(matches!(
            load_config_from_string("strategy: [unclosed"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_config(Some("/nonexistent/harness-config.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "strategy:\n  max_position: \"5\"\n").unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.strategy.max_position, dec!(5));
    }
}
