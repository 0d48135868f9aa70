//! Loads the TOML configuration (route file candidates, endpoints, blocked routes, logging).
//! Every field has a default, so running without a config file is valid.
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    network::{GraphLimits, network_graph::{DEFAULT_MAX_NAME_LEN, DEFAULT_MAX_STATIONS}},
    parsers::blocked::{BlockedRoute, default_blocked_routes},
};

pub const DEFAULT_CONFIG_PATH: &str = "res/config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub analysis: AnalysisConfig,
    pub blocked: BlockedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Route files tried in order; the first one that opens is used.
    pub candidates: Vec<PathBuf>,
    pub max_stations: usize,
    pub max_name_len: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            candidates: vec![PathBuf::from("stations.csv"), PathBuf::from("res/stations.csv")],
            max_stations: DEFAULT_MAX_STATIONS,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl NetworkConfig {
    pub fn limits(&self) -> GraphLimits {
        GraphLimits {
            max_stations: self.max_stations,
            max_name_len: self.max_name_len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub origin: String,
    pub destination: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            origin: "Terra".to_string(),
            destination: "Centauri".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockedConfig {
    pub routes: Vec<BlockedRoute>,
}

impl Default for BlockedConfig {
    fn default() -> Self {
        Self {
            routes: default_blocked_routes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// An explicit path must exist. Without one, `DEFAULT_CONFIG_PATH` is used when present
    /// and built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.origin.is_empty() || self.analysis.destination.is_empty() {
            return Err(ConfigError::Invalid(
                "analysis.origin and analysis.destination must not be empty".to_string(),
            ));
        }
        if self.network.max_stations == 0 {
            return Err(ConfigError::Invalid(
                "network.max_stations must be at least 1".to_string(),
            ));
        }
        if self.network.candidates.is_empty() {
            return Err(ConfigError::Invalid(
                "network.candidates must name at least one route file".to_string(),
            ));
        }
        Ok(())
    }
}
