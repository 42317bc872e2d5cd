//! Configuration module for eventgate-server.
//!
//! Handles loading configuration from a TOML file and applying CLI / env
//! overrides on top of it.

pub mod file;

use crate::config::file::FileConfig;
use eventgate_core::config::PipelineConfig;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file looked up when no path is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "./eventgate.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Values given on the command line or through the environment.
///
/// Each one that is set replaces the file value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub listen: Option<SocketAddr>,
    pub workers: Option<NonZeroUsize>,
    pub queue_capacity: Option<NonZeroUsize>,
}

/// Transport settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    pub listen: SocketAddr,
    pub shutdown_grace: Duration,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedConfig {
    pub server: ServerSettings,
    pub pipeline: PipelineConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    ///
    /// With `config_path == None` the loader reads [`DEFAULT_CONFIG_PATH`] if
    /// it exists and falls back to built-in defaults otherwise. An explicit
    /// path must exist.
    pub fn new(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path,
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (or take defaults)
    /// 2. Apply CLI overrides
    /// 3. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let file_config = match &self.config_path {
            Some(path) => read_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                read_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                tracing::info!("No config file found, using defaults");
                FileConfig::default()
            }
        };

        Ok(self.build_loaded_config(file_config))
    }

    fn build_loaded_config(&self, file_config: FileConfig) -> LoadedConfig {
        let overrides = self.overrides;
        LoadedConfig {
            server: ServerSettings {
                listen: overrides.listen.unwrap_or(file_config.server.listen),
                shutdown_grace: Duration::from_millis(file_config.server.shutdown_grace_ms),
            },
            pipeline: PipelineConfig {
                queue_capacity: overrides
                    .queue_capacity
                    .unwrap_or(file_config.pipeline.queue_capacity),
                workers: overrides.workers.unwrap_or(file_config.pipeline.workers),
            },
        }
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}
