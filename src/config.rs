//! Configuration loading for the gaze pipeline

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Top level configuration, usually read from a `dreyevr.toml`
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GazeConfig {
    #[serde(default)]
    pub vergence: VergenceConfig,
    #[serde(default)]
    pub message: MessageConfig,
}

/// Parameters of the closest-approach vergence estimate
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct VergenceConfig {
    /// Rays whose direction determinant falls below this are treated as parallel (default: 1e-8)
    #[serde(default = "default_parallel_epsilon")]
    pub parallel_epsilon: f64,

    /// Value reported for parallel rays (default: 1.0)
    #[serde(default = "default_parallel_fallback")]
    pub parallel_fallback: f64,

    /// Report parallel rays as indeterminate rather than `parallel_fallback` (default: false)
    #[serde(default)]
    pub strict: bool,

    /// Sensor units per meter (default: 100.0, the sensor reports centimeters)
    #[serde(default = "default_units_per_meter")]
    pub units_per_meter: f64,
}

impl VergenceConfig {
    /// Same geometry, but parallel rays yield no estimate at all
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

impl Default for VergenceConfig {
    fn default() -> Self {
        Self {
            parallel_epsilon: default_parallel_epsilon(),
            parallel_fallback: default_parallel_fallback(),
            strict: false,
            units_per_meter: default_units_per_meter(),
        }
    }
}

/// Text message output settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MessageConfig {
    /// Separator placed after every `key=value` pair (default: "; ")
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl MessageConfig {
    /// The delimiter must contain at least one character that cannot appear inside a
    /// `key=value` pair, otherwise formatted lines no longer split back into their pairs.
    pub fn validate(&self) -> Result<()> {
        let in_pair = |c: char| c.is_alphanumeric() || "_.-+{},=".contains(c);
        if self.delimiter.chars().all(in_pair) {
            return Err(Error::Config(format!(
                "message delimiter {:?} is ambiguous with key=value pairs",
                self.delimiter
            )));
        }
        Ok(())
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_parallel_epsilon() -> f64 {
    1e-8
}

fn default_parallel_fallback() -> f64 {
    1.0
}

fn default_units_per_meter() -> f64 {
    100.0
}

fn default_delimiter() -> String {
    "; ".to_string()
}

impl GazeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading gaze configuration from {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.message.validate()?;
        Ok(config)
    }
}
