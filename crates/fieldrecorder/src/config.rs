//! Configuration management for fieldrecorder.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::convert::{ConversionOptions, Converter, Datum};
use crate::error::{Error, Result};
use crate::track::{TrackPolicy, DEFAULT_MAX_ACCURACY_M};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "fieldrecorder";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FIELDRECORDER_`)
/// 2. TOML config file at `~/.config/fieldrecorder/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coordinate conversion configuration.
    pub conversion: ConversionConfig,
    /// GPS trail configuration.
    pub track: TrackConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Coordinate conversion configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Datum handling for GPS input: `airy` (no shift) or `helmert`.
    pub datum: Datum,
}

/// GPS trail configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Fixes reporting a worse accuracy than this are dropped from trails,
    /// except for the first point.
    pub max_accuracy_m: f64,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print JSON instead of plain text.
    pub json: bool,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            max_accuracy_m: DEFAULT_MAX_ACCURACY_M,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FIELDRECORDER_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FIELDRECORDER_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let limit = self.track.max_accuracy_m;
        if !limit.is_finite() || limit <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!("track.max_accuracy_m must be a positive number, got {limit}"),
            });
        }
        Ok(())
    }

    /// The converter described by this configuration.
    #[must_use]
    pub fn converter(&self) -> Converter {
        Converter::new(ConversionOptions {
            datum: self.conversion.datum,
        })
    }

    /// The trail filtering policy described by this configuration.
    #[must_use]
    pub fn track_policy(&self) -> TrackPolicy {
        TrackPolicy {
            max_accuracy_m: self.track.max_accuracy_m,
        }
    }
}
