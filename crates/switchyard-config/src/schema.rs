//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Job polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Poll budget for a single job, measured from submit.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Initial poll interval.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound on the poll interval.
    #[serde(default = "default_max_poll_interval_ms")]
    pub max_poll_interval_ms: u64,

    /// Growth factor applied after each poll.
    #[serde(default = "default_poll_backoff")]
    pub poll_backoff: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_interval_ms: default_max_poll_interval_ms(),
            poll_backoff: default_poll_backoff(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    300_000
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_max_poll_interval_ms() -> u64 {
    10_000
}

fn default_poll_backoff() -> f64 {
    1.5
}

/// Name resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Whether fuzzy matching is on when the caller does not say.
    #[serde(default)]
    pub fuzzy: bool,

    /// Candidates must score strictly above this to be returned.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Extra shorthand names, merged over the built-in table.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy: false,
            fuzzy_threshold: default_fuzzy_threshold(),
            max_suggestions: default_max_suggestions(),
            aliases: HashMap::new(),
        }
    }
}

fn default_fuzzy_threshold() -> f64 {
    0.3
}

fn default_max_suggestions() -> usize {
    3
}

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_true")]
    pub stop_on_error: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stop_on_error: default_true(),
        }
    }
}

/// Definition sources loaded at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON catalog files of serialized definitions.
    #[serde(default)]
    pub catalogs: Vec<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines on the console.
    #[serde(default)]
    pub json: bool,

    /// Directory for daily-rolling log files. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            directory: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
