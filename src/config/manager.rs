use super::defaults::{default_config, get_config_file_path};
use super::{Config, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct ConfigManager;

impl ConfigManager {
    pub fn load() -> Result<Config> {
        Self::load_with_path(None)
    }

    /// Loads settings from `config_path` (or the default location), falling back
    /// to built-in defaults when no file exists. The file is never created.
    pub fn load_with_path(config_path: Option<&Path>) -> Result<Config> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => get_config_file_path(),
        };

        if config_path.exists() {
            debug!("Loading settings from {}", config_path.display());
            Self::load_from_file(&config_path)
        } else {
            debug!(
                "No settings file at {}, using defaults",
                config_path.display()
            );
            let config = default_config();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
