//! Configuration loading for the Quiver pipeline driver.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use quiver_data::ReadMode;
use serde::Deserialize;
use thiserror::Error;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "QUIVER";

/// Errors produced while assembling a [`PipelineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not deserialize.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    /// Values loaded but failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings consumed by the pipeline driver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Indicator window used when none is given on the command line.
    pub window: usize,
    /// Number of leading values of each result series to log.
    pub preview: usize,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Array codec settings.
    pub codec: CodecConfig,
    /// Crossover backtest defaults.
    pub backtest: BacktestSettings,
}

/// Array codec settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Trailing-byte policy of the reader.
    pub mode: ReadMode,
}

/// Defaults for the `backtest` command.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// Fast moving-average window.
    pub fast: usize,
    /// Slow moving-average window.
    pub slow: usize,
    /// Per-period risk-free rate used by the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            fast: 10,
            slow: 30,
            risk_free_rate: 0.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: 10,
            preview: 20,
            log_level: "info".into(),
            codec: CodecConfig::default(),
            backtest: BacktestSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads settings from defaults, the optional TOML file at `path`, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from an in-memory TOML document, without environment overrides.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::Invalid("window must be at least 1".into()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".into()));
        }
        if self.backtest.fast == 0 || self.backtest.slow == 0 {
            return Err(ConfigError::Invalid("backtest windows must be at least 1".into()));
        }
        Ok(())
    }
}
