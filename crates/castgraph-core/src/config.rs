//! castgraph Configuration Management
//!
//! Handles configuration from a TOML file and environment variables,
//! with defaults that reproduce the built-in ARROW data set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::CuratedFact;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Crawler (fetch layer) configuration
    pub crawler: CrawlerConfig,

    /// Extraction pipeline configuration
    pub extraction: ExtractionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Entity -> aliases. Replaces the built-in cast when present.
    pub cast: Option<BTreeMap<String, Vec<String>>>,

    /// Relation type -> indicator phrases. Replaces the built-in lexicon when present.
    pub lexicon: Option<BTreeMap<String, Vec<String>>>,

    /// Curated facts. Replaces the built-in list when present.
    pub curated: Option<Vec<CuratedFact>>,

    /// Default sources for `crawl` when none are given on the command line
    pub sources: Option<Vec<String>>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(delay) = std::env::var("CASTGRAPH_DELAY_MS") {
            self.crawler.delay_ms = delay.parse().map_err(|_| ConfigError::InvalidValue {
                key: "CASTGRAPH_DELAY_MS".to_string(),
                value: delay,
            })?;
        }
        if let Ok(agent) = std::env::var("CASTGRAPH_USER_AGENT") {
            self.crawler.user_agent = agent;
        }
        if let Ok(pairing) = std::env::var("CASTGRAPH_PAIRING") {
            self.extraction.pairing = pairing.parse()?;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }
}

/// Fetch layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pause between two requests, in milliseconds
    pub delay_ms: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

/// How entity pairs are formed within a text unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// Every pair of entities found in the unit
    #[default]
    AllPairs,
    /// Only entities that are next to each other in order of first mention
    Adjacent,
}

impl std::str::FromStr for PairingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all_pairs" | "all" => Ok(Self::AllPairs),
            "adjacent" => Ok(Self::Adjacent),
            _ => Err(ConfigError::InvalidValue {
                key: "CASTGRAPH_PAIRING".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Extraction pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pair formation strategy
    pub pairing: PairingMode,

    /// Provenance snippets kept per edge
    pub max_snippets: usize,

    /// Characters kept per snippet
    pub snippet_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pairing: PairingMode::AllPairs,
            max_snippets: 5,
            snippet_chars: 100,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.crawler.delay_ms, 2000);
        assert_eq!(config.extraction.pairing, PairingMode::AllPairs);
        assert_eq!(config.extraction.snippet_chars, 100);
        assert!(config.cast.is_none());
    }

    #[test]
    fn test_pairing_mode_parse() {
        assert_eq!(
            "adjacent".parse::<PairingMode>().unwrap(),
            PairingMode::Adjacent
        );
        assert_eq!(
            "all-pairs".parse::<PairingMode>().unwrap(),
            PairingMode::AllPairs
        );
        assert!("nearest".parse::<PairingMode>().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[crawler]
delay_ms = 0

[extraction]
pairing = "adjacent"

[cast]
Alice = ["alice"]
Barb = ["barb", "barbara"]

[lexicon]
familial = ["mother"]

[[curated]]
entity_a = "Alice"
entity_b = "Barb"
relation = "familial"
description = "Mother and daughter"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.crawler.delay_ms, 0);
        assert_eq!(config.crawler.timeout_secs, 30);
        assert_eq!(config.extraction.pairing, PairingMode::Adjacent);
        assert_eq!(config.cast.unwrap()["Barb"], vec!["barb", "barbara"]);
        assert_eq!(config.curated.unwrap().len(), 1);
    }

    #[test]
    fn test_from_missing_file() {
        let err = AppConfig::from_file("/nonexistent/castgraph.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError { .. }));
    }
}
