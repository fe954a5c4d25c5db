use super::{Config, ConfigError, CredentialConfig, GitConfig, RemoteConfig, Result};

pub fn validate_config(config: &Config) -> Result<()> {
    validate_git_config(&config.git)?;
    validate_remote_config(&config.remote)?;
    validate_credential_config(&config.credentials)?;
    Ok(())
}

pub fn validate_git_config(git: &GitConfig) -> Result<()> {
    if let Some(mainline) = &git.mainline {
        if mainline.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Mainline branch name cannot be empty".to_string(),
            ));
        }
        if mainline.starts_with("refs/") {
            return Err(ConfigError::Validation(format!(
                "Mainline '{}' must be a short branch name, not a ref path",
                mainline
            )));
        }
    }
    Ok(())
}

pub fn validate_remote_config(remote: &RemoteConfig) -> Result<()> {
    if remote.list_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "Remote listing timeout must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_credential_config(credentials: &CredentialConfig) -> Result<()> {
    if credentials.section.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Credential section cannot be empty".to_string(),
        ));
    }

    if credentials.ssh_user.trim().is_empty() {
        return Err(ConfigError::Validation(
            "SSH user cannot be empty".to_string(),
        ));
    }

    if credentials.ssh_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "SSH key path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
