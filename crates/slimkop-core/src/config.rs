use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::catalog::DEFAULT_TIMER_MINUTES;
use super::derive::PhaseGate;
use super::error::ConfigError;

pub const DEFAULT_STORAGE_KEY: &str = "slimkop-app-data";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub routine: RoutineConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Reads a TOML config. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RoutineConfig {
    pub empty_phase_counts_complete: bool,
    pub default_timer_minutes: u32,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            empty_phase_counts_complete: true,
            default_timer_minutes: DEFAULT_TIMER_MINUTES,
        }
    }
}

impl RoutineConfig {
    pub fn gate(&self) -> PhaseGate {
        PhaseGate {
            empty_phase_counts_complete: self.empty_phase_counts_complete,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}
