use super::endpoint::{Endpoint, Scheme};
use crate::config::CredentialConfig;
use crate::utils::error::{Result, SweepError};
use git2::{Cred, CredentialType};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Single credential chosen for a remote.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    SshAgent { username: String },
    SshKey { username: String, private_key: PathBuf },
    UserPass { username: String, password: String },
}

impl Credential {
    pub fn username(&self) -> &str {
        match self {
            Self::SshAgent { username }
            | Self::SshKey { username, .. }
            | Self::UserPass { username, .. } => username,
        }
    }

    /// Converts into the libgit2 credential offered during the transport handshake.
    pub fn to_git2(&self, allowed: CredentialType) -> std::result::Result<Cred, git2::Error> {
        match self {
            Self::SshAgent { username } if allowed.contains(CredentialType::SSH_KEY) => {
                Cred::ssh_key_from_agent(username)
            }
            Self::SshKey {
                username,
                private_key,
            } if allowed.contains(CredentialType::SSH_KEY) => {
                Cred::ssh_key(username, None, private_key, None)
            }
            Self::UserPass { username, password }
                if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) =>
            {
                Cred::userpass_plaintext(username, password)
            }
            _ => Err(git2::Error::from_str(&format!(
                "remote asked for {:?}, which the selected credential cannot provide",
                allowed
            ))),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SshAgent { username } => f
                .debug_struct("SshAgent")
                .field("username", username)
                .finish(),
            Self::SshKey {
                username,
                private_key,
            } => f
                .debug_struct("SshKey")
                .field("username", username)
                .field("private_key", private_key)
                .finish(),
            Self::UserPass { username, .. } => f
                .debug_struct("UserPass")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Outcome of credential resolution for a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// Local filesystem remote
    NotRequired,
    Credential(Credential),
}

/// Picks a credential for a remote URL from the URL itself, the per-user
/// global git config, a running SSH agent, or a default private key.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    home_dir: PathBuf,
    os_user: String,
    ssh_agent_socket: Option<PathBuf>,
    settings: CredentialConfig,
}

impl CredentialResolver {
    pub fn new(
        home_dir: impl Into<PathBuf>,
        os_user: impl Into<String>,
        ssh_agent_socket: Option<PathBuf>,
        settings: CredentialConfig,
    ) -> Self {
        Self {
            home_dir: home_dir.into(),
            os_user: os_user.into(),
            ssh_agent_socket,
            settings,
        }
    }

    /// Builds a resolver for the current OS user.
    pub fn from_environment(settings: &CredentialConfig) -> Result<Self> {
        let home_dir = directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or_else(|| {
                SweepError::config_unavailable("couldn't determine the home directory")
            })?;
        let ssh_agent_socket = std::env::var_os("SSH_AUTH_SOCK").map(PathBuf::from);

        Ok(Self::new(
            home_dir,
            whoami::username(),
            ssh_agent_socket,
            settings.clone(),
        ))
    }

    pub fn global_config_path(&self) -> PathBuf {
        self.home_dir.join(".gitconfig")
    }

    pub fn default_key_path(&self) -> PathBuf {
        self.home_dir.join(&self.settings.ssh_key)
    }

    pub fn resolve(&self, url: &str) -> Result<Authentication> {
        let endpoint = Endpoint::parse(url)?;

        match &endpoint.scheme {
            Scheme::File => Ok(Authentication::NotRequired),
            Scheme::Ssh => self.resolve_ssh(url, &endpoint).map(Authentication::Credential),
            Scheme::Http | Scheme::Https => {
                self.resolve_http(&endpoint).map(Authentication::Credential)
            }
            Scheme::Other(scheme) => Err(SweepError::unsupported_scheme(scheme.as_str())),
        }
    }

    fn resolve_ssh(&self, url: &str, endpoint: &Endpoint) -> Result<Credential> {
        let username = endpoint
            .user
            .clone()
            .unwrap_or_else(|| self.settings.ssh_user.clone());

        if self.agent_available() {
            debug!("Using ssh agent for {}", url);
            return Ok(Credential::SshAgent { username });
        }

        let private_key = self.default_key_path();
        if private_key.is_file() {
            debug!("Using ssh key {} for {}", private_key.display(), url);
            return Ok(Credential::SshKey {
                username,
                private_key,
            });
        }

        Err(SweepError::no_credential_found(
            url,
            format!(
                "neither an ssh agent nor the key file {} is available",
                private_key.display()
            ),
        ))
    }

    fn agent_available(&self) -> bool {
        self.ssh_agent_socket
            .as_deref()
            .is_some_and(|socket| !socket.as_os_str().is_empty() && socket.exists())
    }

    fn resolve_http(&self, endpoint: &Endpoint) -> Result<Credential> {
        if let Some(password) = &endpoint.password {
            let username = endpoint
                .user
                .clone()
                .unwrap_or_else(|| self.os_user.clone());
            return Ok(Credential::UserPass {
                username,
                password: password.clone(),
            });
        }

        let config_path = self.global_config_path();
        let (section_user, token) = self.read_token(&config_path)?;

        let username = endpoint
            .user
            .clone()
            .or(section_user)
            .unwrap_or_else(|| self.os_user.clone());

        Ok(Credential::UserPass {
            username,
            password: token,
        })
    }

    /// Reads `<section>.user` and `<section>.token` from the global git config file.
    fn read_token(&self, path: &Path) -> Result<(Option<String>, String)> {
        if !path.is_file() {
            return Err(SweepError::config_unavailable(format!(
                "couldn't read {}",
                path.display()
            )));
        }

        let config = git2::Config::open(path).map_err(|e| {
            SweepError::config_unavailable(format!(
                "couldn't parse {}: {}",
                path.display(),
                e.message()
            ))
        })?;

        let section = &self.settings.section;
        let read = |key: &str| -> Option<String> {
            config
                .get_string(&format!("{}.{}", section, key))
                .ok()
                .filter(|value| !value.is_empty())
        };

        let token = read("token").ok_or_else(|| {
            SweepError::token_not_found(section.as_str(), path.display().to_string())
        })?;

        Ok((read("user"), token))
    }
}
