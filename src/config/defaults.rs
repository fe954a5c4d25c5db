use super::{Config, CredentialConfig, RemoteConfig, RemoteLookup};

/// Environment variable overriding the settings file location
pub const CONFIG_ENV_VAR: &str = "GIT_SWEEP_CONFIG";

pub fn default_config() -> Config {
    Config::default()
}

pub fn default_remote_config() -> RemoteConfig {
    RemoteConfig {
        list_timeout_secs: 30,
        lookup: RemoteLookup::Network,
    }
}

pub fn default_credential_config() -> CredentialConfig {
    CredentialConfig {
        section: "github".to_string(),
        ssh_user: "git".to_string(),
        ssh_key: ".ssh/id_rsa".to_string(),
    }
}

pub fn get_default_config_dir() -> std::path::PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "git-sweep") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(".config")
            .join("git-sweep")
    }
}

pub fn get_config_file_path() -> std::path::PathBuf {
    if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
        return std::path::PathBuf::from(config_path);
    }

    get_default_config_dir().join("config.json")
}
