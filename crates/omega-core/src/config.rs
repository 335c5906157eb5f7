//! Configuration loading and typed config structures for the Omega engine.
//!
//! The canonical configuration lives in `omega-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads it. Every field has a default,
//! so an empty document is a valid configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::CoreError;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `omega-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OmegaConfig {
    /// Engine construction parameters.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Driver settings for the engine binary.
    #[serde(default)]
    pub run: RunConfig,

    /// External input source settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl OmegaConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Engine construction parameters. Fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Number of grid rows.
    #[serde(default = "default_n_domains")]
    pub n_domains: usize,

    /// Number of grid columns.
    #[serde(default = "default_domain_size")]
    pub domain_size: usize,

    /// Weight given to the row/column neighborhood average.
    #[serde(default = "default_coupling")]
    pub coupling: f64,

    /// Fraction of each cell's previous value that is shed per step.
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Capacity of the event history.
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

impl EngineConfig {
    /// State vector length, or `None` if `n_domains * domain_size`
    /// overflows.
    pub const fn checked_dim(&self) -> Option<usize> {
        self.n_domains.checked_mul(self.domain_size)
    }

    /// Check that the parameters describe a usable engine.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the first problem
    /// found.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.n_domains == 0 {
            return Err(invalid("n_domains must be at least 1"));
        }
        if self.domain_size == 0 {
            return Err(invalid("domain_size must be at least 1"));
        }
        if self.max_events == 0 {
            return Err(invalid("max_events must be at least 1"));
        }
        if self.checked_dim().is_none() {
            return Err(invalid("n_domains * domain_size overflows usize"));
        }
        if !self.coupling.is_finite() {
            return Err(invalid("coupling must be finite"));
        }
        if !self.damping.is_finite() {
            return Err(invalid("damping must be finite"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_domains: default_n_domains(),
            domain_size: default_domain_size(),
            coupling: default_coupling(),
            damping: default_damping(),
            max_events: default_max_events(),
        }
    }
}

/// Settings for the engine binary's driving loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Identifier attached to log output for this run.
    #[serde(default = "default_run_id")]
    pub run_id: String,

    /// Number of steps to execute.
    #[serde(default = "default_steps")]
    pub steps: u64,

    /// Vector passed to `initialize`; padded or truncated to `dim`.
    #[serde(default = "default_initial_vector")]
    pub initial_vector: Vec<f64>,

    /// Prefix for step tags; step `k` is tagged `{tag_prefix}{k}`.
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Write each step record to stdout as a JSON line.
    #[serde(default)]
    pub emit_json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run_id: default_run_id(),
            steps: default_steps(),
            initial_vector: default_initial_vector(),
            tag_prefix: default_tag_prefix(),
            emit_json: false,
        }
    }
}

/// External input source configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct InputConfig {
    /// Half-width of the uniform noise band. `0.0` disables external input.
    #[serde(default)]
    pub amplitude: f64,

    /// Seed for the noise generator.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.0,
            seed: default_seed(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn invalid(reason: &str) -> CoreError {
    CoreError::InvalidConfig {
        reason: reason.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_n_domains() -> usize {
    12
}

const fn default_domain_size() -> usize {
    12
}

const fn default_coupling() -> f64 {
    0.18
}

const fn default_damping() -> f64 {
    0.04
}

const fn default_max_events() -> usize {
    500
}

fn default_run_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

const fn default_steps() -> u64 {
    5
}

fn default_initial_vector() -> Vec<f64> {
    vec![1.0, 0.0, 1.0, 1.0]
}

fn default_tag_prefix() -> String {
    "step_".to_owned()
}

const fn default_seed() -> u64 {
    42
}

fn default_log_level() -> String {
    "info".to_owned()
}
