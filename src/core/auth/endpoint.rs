use crate::utils::error::{Result, SweepError};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    Ssh,
    Http,
    Https,
    File,
    Other(String),
}

impl Scheme {
    fn from_url_scheme(scheme: &str) -> Self {
        match scheme {
            "ssh" | "git+ssh" | "ssh+git" => Self::Ssh,
            "http" => Self::Http,
            "https" => Self::Https,
            "file" => Self::File,
            other => Self::Other(other.to_string()),
        }
    }
}

/// The parts of a remote URL that matter for picking a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
}

fn scp_like_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(?:(?P<user>[^@/:]+)@)?(?P<host>[^@/:]{2,}):(?P<path>.*)$")
            .expect("scp-like pattern is valid")
    })
}

impl Endpoint {
    /// Parses a remote URL.
    ///
    /// Accepts `scheme://` URLs, scp-like `[user@]host:path` (treated as ssh)
    /// and plain filesystem paths (treated as file).
    pub fn parse(url: &str) -> Result<Self> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(SweepError::invalid_remote_url(url, "empty URL"));
        }

        if trimmed.contains("://") {
            return Self::parse_url(trimmed);
        }

        if let Some(caps) = scp_like_regex().captures(trimmed) {
            return Ok(Self {
                scheme: Scheme::Ssh,
                user: caps.name("user").map(|m| m.as_str().to_string()),
                password: None,
                host: caps.name("host").map(|m| m.as_str().to_string()),
            });
        }

        Ok(Self {
            scheme: Scheme::File,
            user: None,
            password: None,
            host: None,
        })
    }

    fn parse_url(raw: &str) -> Result<Self> {
        let parsed =
            url::Url::parse(raw).map_err(|e| SweepError::invalid_remote_url(raw, e.to_string()))?;

        let user = Some(parsed.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        let password = parsed
            .password()
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            scheme: Scheme::from_url_scheme(parsed.scheme()),
            user,
            password,
            host: parsed.host_str().map(str::to_string),
        })
    }
}
