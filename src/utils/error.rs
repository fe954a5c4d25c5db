use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid remote URL '{url}': {reason}")]
    InvalidRemoteUrl { url: String, reason: String },

    #[error("Unsupported remote scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },

    #[error("No credential found for '{url}': {reason}")]
    NoCredentialFound { url: String, reason: String },

    #[error("Token not found in section '{section}' of {path}")]
    TokenNotFound { section: String, path: String },

    #[error("Configuration unavailable: {message}")]
    ConfigUnavailable { message: String },

    #[error("Remote '{remote}' unreachable: {message}")]
    RemoteUnreachable { remote: String, message: String },

    #[error("Reference loader error for branch '{branch}': {source}")]
    ReferenceLoader {
        branch: String,
        #[source]
        source: Box<SweepError>,
    },

    #[error("Could not walk history of '{branch}': {message}")]
    AncestryWalk { branch: String, message: String },

    #[error("Failed to delete branch '{branch}': {message}")]
    DeletionFailed { branch: String, message: String },

    #[error("Branch '{branch}' deleted but its config entry remains: {message}")]
    ConfigPersistFailed { branch: String, message: String },

    #[error("No git repository found at or above {path}")]
    RepositoryNotFound { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SweepError>;

impl SweepError {
    pub fn invalid_remote_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRemoteUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_scheme(scheme: impl Into<String>) -> Self {
        Self::UnsupportedScheme {
            scheme: scheme.into(),
        }
    }

    pub fn no_credential_found(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoCredentialFound {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn token_not_found(section: impl Into<String>, path: impl Into<String>) -> Self {
        Self::TokenNotFound {
            section: section.into(),
            path: path.into(),
        }
    }

    pub fn config_unavailable(message: impl Into<String>) -> Self {
        Self::ConfigUnavailable {
            message: message.into(),
        }
    }

    pub fn remote_unreachable(remote: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteUnreachable {
            remote: remote.into(),
            message: message.into(),
        }
    }

    pub fn reference_loader(branch: impl Into<String>, source: SweepError) -> Self {
        Self::ReferenceLoader {
            branch: branch.into(),
            source: Box::new(source),
        }
    }

    pub fn ancestry_walk(branch: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AncestryWalk {
            branch: branch.into(),
            message: message.into(),
        }
    }

    pub fn deletion_failed(branch: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DeletionFailed {
            branch: branch.into(),
            message: message.into(),
        }
    }

    pub fn config_persist_failed(branch: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigPersistFailed {
            branch: branch.into(),
            message: message.into(),
        }
    }

    pub fn repository_not_found(path: impl Into<String>) -> Self {
        Self::RepositoryNotFound { path: path.into() }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Errors that only affect the branch being processed and must not stop a run.
    pub fn is_per_branch(&self) -> bool {
        matches!(
            self,
            Self::AncestryWalk { .. } | Self::DeletionFailed { .. } | Self::ConfigPersistFailed { .. }
        )
    }
}

impl From<crate::config::ConfigError> for SweepError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}
