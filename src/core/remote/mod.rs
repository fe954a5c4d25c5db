use git2::Oid;
use std::fmt;

pub mod cache;
pub mod lister;

pub use cache::RemoteRefCache;
pub use lister::{Git2RemoteLister, RemoteLister, RemoteTrackingLister};

/// A configured remote as read from repository config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    pub name: String,
    pub url: Option<String>,
}

impl RemoteSpec {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }

    /// Key under which listings are memoized. Two remotes with the same
    /// name but different URLs are listed separately.
    pub fn identity(&self) -> String {
        format!("{} {}", self.name, self.url.as_deref().unwrap_or(""))
    }
}

impl fmt::Display for RemoteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{} ({})", self.name, url),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One entry of a remote's advertised reference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub name: String,
    pub target: Oid,
}

impl RemoteRef {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_includes_url() {
        let a = RemoteSpec::new("origin", Some("https://a.example/repo".to_string()));
        let b = RemoteSpec::new("origin", Some("https://b.example/repo".to_string()));
        assert_ne!(a.identity(), b.identity());
        assert_eq!(a.identity(), "origin https://a.example/repo");
    }

    #[test]
    fn test_display() {
        let spec = RemoteSpec::new("origin", None);
        assert_eq!(spec.to_string(), "origin");
        let spec = RemoteSpec::new("origin", Some("/srv/repo.git".to_string()));
        assert_eq!(spec.to_string(), "origin (/srv/repo.git)");
    }
}
