use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod defaults;
pub mod manager;
pub mod validation;

pub use manager::ConfigManager;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub git: GitConfig,
    pub remote: RemoteConfig,
    pub credentials: CredentialConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GitConfig {
    /// Mainline branch name; detected from the repository when unset
    pub mainline: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct RemoteConfig {
    pub list_timeout_secs: u64,
    pub lookup: RemoteLookup,
}

/// Where the orphan detector looks for a tracking branch's upstream.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteLookup {
    /// List the remote's references over the network
    #[default]
    Network,
    /// Only consult local `refs/remotes/<remote>/...` refs
    RemoteTracking,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct CredentialConfig {
    /// Section of the global git config holding `user` and `token`
    pub section: String,
    pub ssh_user: String,
    /// Private key path, relative to the home directory
    pub ssh_key: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        defaults::default_remote_config()
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        defaults::default_credential_config()
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json(error)
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    pub fn mainline_override(&self) -> Option<&str> {
        self.git.mainline.as_deref()
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.list_timeout_secs)
    }

    pub fn remote_lookup(&self) -> RemoteLookup {
        self.remote.lookup
    }
}
