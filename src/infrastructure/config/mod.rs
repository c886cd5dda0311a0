use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::pipeline_config::PipelineConfig;

pub const ENV_PREFIX: &str = "TITANIC_LAB_";
pub const DEFAULT_CONFIG_FILE: &str = "titanic-lab.toml";

/// Layered configuration: defaults, then TOML file, then `TITANIC_LAB_*` env vars
pub struct ConfigService {
    config_path: Option<PathBuf>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Use an explicit TOML file; unlike the default file it must exist
    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: Some(path.as_ref().to_path_buf()),
        }
    }

    pub fn figment(&self) -> Figment {
        let file = self
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(PipelineConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(&self) -> Result<PipelineConfig> {
        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(AppError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }

        let config: PipelineConfig = self.figment().extract()?;
        debug!(
            file = ?self.config_path,
            log_level = %config.log_level,
            "Loaded pipeline configuration"
        );
        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid pipeline config: {}", e)))?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
