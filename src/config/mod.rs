mod defaults;
mod validation;

pub use defaults::*;
pub use validation::*;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Top-level configuration for the function binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub gopass: GopassConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the gopass provider is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GopassConfig {
    pub binary: String,
    pub timeout_secs: u64,
    pub max_output_bytes: usize,
}

impl Default for GopassConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_GOPASS_BIN.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `tracing` filter directives, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl Config {
    /// Load configuration from an optional file, then apply environment overrides.
    ///
    /// Callers layer their own overrides on top and then call [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => load_config_file(path)?,
            None => Config::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Fail on the first batch of validation errors.
    pub fn validate(&self) -> Result<()> {
        let errors = validate_config(self);
        if errors.is_empty() {
            return Ok(());
        }
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration: {}", details.join("; "))
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(binary) = lookup(ENV_GOPASS_BIN) {
            self.gopass.binary = binary;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            match timeout.parse() {
                Ok(secs) => self.gopass.timeout_secs = secs,
                Err(_) => warn!("Ignoring {ENV_TIMEOUT_SECS}='{timeout}': not a number of seconds"),
            }
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            match format.parse() {
                Ok(format) => self.logging.format = format,
                Err(err) => warn!("Ignoring {ENV_LOG_FORMAT}: {err}"),
            }
        }
    }
}

/// Load configuration from a file path. The extension picks the format.
fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config '{}'", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML config '{}'", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML config '{}'", path.display()))?,
    };

    Ok(config)
}
