use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::osm::BuildOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Saved Overpass JSON dumps to read
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_true")]
    pub include_ways: bool,
    #[serde(default = "default_true")]
    pub include_relations: bool,
    #[serde(default)]
    pub skip_unresolved: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: None,
            verbose: false,
            include_ways: true,
            include_relations: true,
            skip_unresolved: false,
        }
    }
}

impl FileConfig {
    /// Load the first parseable config from the default search paths
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => return Some(config),
                Err(e) => warn!("{}", e),
            }
        }
        None
    }

    /// Load an explicitly requested config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            include_ways: self.include_ways,
            include_relations: self.include_relations,
            skip_unresolved: self.skip_unresolved,
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("osm-areas.toml"));
    paths.push(PathBuf::from(".osm-areas.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("osm-areas").join("config.toml"));
        paths.push(config_dir.join("osm-areas.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".osm-areas.toml"));
    }

    paths
}
