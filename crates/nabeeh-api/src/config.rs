//! Configuration file parsing for the API server.
//!
//! Loads the bind address, snapshot path, log filter and optional scoring
//! overrides from a TOML file.

use nabeeh_domain::{ScoringConfig, Severity};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    pub bind_port: u16,

    /// Path to the JSON incident snapshot
    pub data_path: PathBuf,

    /// `tracing` filter used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Scoring table overrides
    #[serde(default)]
    pub scoring: ScoringSection,
}

/// `[scoring]` table; every key is optional and falls back to the defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    /// Per-violation weights, merged over the default weight table
    pub weights: HashMap<String, f64>,

    /// Weight for violation types absent from the table
    pub default_weight: Option<f64>,

    /// Multipliers keyed by `LOW`, `MEDIUM` or `HIGH`
    pub severity_multipliers: HashMap<String, f64>,

    /// Multiplier for severities absent from the table
    pub default_multiplier: Option<f64>,

    /// Score at or above which the level is HIGH
    pub high_threshold: Option<f64>,

    /// Score at or above which the level is MEDIUM
    pub medium_threshold: Option<f64>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl ScoringSection {
    /// Merge the overrides into the default scoring tables
    pub fn to_scoring_config(&self) -> Result<ScoringConfig, ConfigError> {
        let mut config = ScoringConfig::default();

        for (violation_type, &weight) in &self.weights {
            check_non_negative(&format!("scoring.weights.{}", violation_type), weight)?;
            config.weights.insert(violation_type.clone(), weight);
        }

        for (key, &multiplier) in &self.severity_multipliers {
            let severity = Severity::parse(key).ok_or_else(|| ConfigError::InvalidValue {
                field: format!("scoring.severity_multipliers.{}", key),
                reason: "expected LOW, MEDIUM or HIGH".to_string(),
            })?;
            check_non_negative(&format!("scoring.severity_multipliers.{}", key), multiplier)?;
            config.severity_multipliers.insert(severity, multiplier);
        }

        if let Some(weight) = self.default_weight {
            check_non_negative("scoring.default_weight", weight)?;
            config.default_weight = weight;
        }
        if let Some(multiplier) = self.default_multiplier {
            check_non_negative("scoring.default_multiplier", multiplier)?;
            config.default_multiplier = multiplier;
        }
        if let Some(threshold) = self.high_threshold {
            config.high_threshold = threshold;
        }
        if let Some(threshold) = self.medium_threshold {
            config.medium_threshold = threshold;
        }

        if config.medium_threshold > config.high_threshold {
            return Err(ConfigError::InvalidValue {
                field: "scoring.medium_threshold".to_string(),
                reason: format!(
                    "{} exceeds high_threshold {}",
                    config.medium_threshold, config.high_threshold
                ),
            });
        }

        Ok(config)
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{} is not a finite non-negative number", value),
        })
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;

        if config.data_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("data_path".to_string()));
        }
        // Surface bad scoring overrides at load time rather than at startup
        config.scoring.to_scoring_config()?;

        Ok(config)
    }

    /// Local defaults: loopback on port 8000 with the bundled sample snapshot
    pub fn default_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            data_path: PathBuf::from("data/sample_snapshot.json"),
            log_filter: default_log_filter(),
            scoring: ScoringSection::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.data_path, PathBuf::from("data/sample_snapshot.json"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            data_path = "/var/lib/nabeeh/snapshot.json"
            log_filter = "nabeeh_api=debug"

            [scoring]
            high_threshold = 30.0

            [scoring.weights]
            loitering = 1.5
            violence = 6.0

            [scoring.severity_multipliers]
            medium = 0.5
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.log_filter, "nabeeh_api=debug");

        let scoring = config.scoring.to_scoring_config().unwrap();
        assert_eq!(scoring.weights["loitering"], 1.5);
        assert_eq!(scoring.weights["violence"], 6.0);
        assert_eq!(scoring.weights["smoking"], 2.0);
        assert_eq!(scoring.severity_multipliers[&Severity::Medium], 0.5);
        assert_eq!(scoring.severity_multipliers[&Severity::High], 1.0);
        assert_eq!(scoring.high_threshold, 30.0);
        assert_eq!(scoring.medium_threshold, 10.0);
    }

    #[test]
    fn test_scoring_section_defaults() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8000
            data_path = "data/sample_snapshot.json"
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        let scoring = config.scoring.to_scoring_config().unwrap();
        let defaults = ScoringConfig::default();
        assert_eq!(scoring.weights, defaults.weights);
        assert_eq!(scoring.severity_multipliers, defaults.severity_multipliers);
        assert_eq!(scoring.high_threshold, defaults.high_threshold);
    }

    #[test]
    fn test_rejects_unknown_severity_key() {
        let section = ScoringSection {
            severity_multipliers: HashMap::from([("CRITICAL".to_string(), 2.0)]),
            ..ScoringSection::default()
        };
        assert!(matches!(
            section.to_scoring_config(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let section = ScoringSection {
            weights: HashMap::from([("violence".to_string(), -1.0)]),
            ..ScoringSection::default()
        };
        assert!(section.to_scoring_config().is_err());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let section = ScoringSection {
            medium_threshold: Some(40.0),
            ..ScoringSection::default()
        };
        assert!(section.to_scoring_config().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "bind_address = \"127.0.0.1\"\nbind_port = 8100\ndata_path = \"snapshot.json\""
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bind_port, 8100);
        assert_eq!(config.data_path, PathBuf::from("snapshot.json"));
    }

    #[test]
    fn test_from_file_missing_data_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "bind_address = \"127.0.0.1\"\nbind_port = 8100\ndata_path = \"\""
        )
        .unwrap();

        assert!(matches!(
            ServerConfig::from_file(file.path()),
            Err(ConfigError::MissingField(field)) if field == "data_path"
        ));
    }

    #[test]
    fn test_from_file_not_found() {
        assert!(matches!(
            ServerConfig::from_file("/nonexistent/server.toml"),
            Err(ConfigError::FileRead(_))
        ));
    }
}
