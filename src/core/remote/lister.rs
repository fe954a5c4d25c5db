use super::{RemoteRef, RemoteSpec};
use crate::core::auth::Authentication;
use crate::utils::error::{Result, SweepError};
use git2::{CredentialType, Direction, RemoteCallbacks, Repository};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Lists the references a remote advertises.
pub trait RemoteLister: Send + Sync {
    fn list(&self, remote: &RemoteSpec, url: &str, auth: &Authentication)
        -> Result<Vec<RemoteRef>>;

    /// Whether `list` needs a resolved credential.
    fn needs_credentials(&self) -> bool {
        true
    }
}

/// Lists references through a detached libgit2 remote connection.
#[derive(Debug, Clone)]
pub struct Git2RemoteLister {
    timeout: Duration,
}

impl Git2RemoteLister {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl RemoteLister for Git2RemoteLister {
    fn list(
        &self,
        remote: &RemoteSpec,
        url: &str,
        auth: &Authentication,
    ) -> Result<Vec<RemoteRef>> {
        let (tx, rx) = mpsc::channel();
        let url_owned = url.to_string();
        let auth_owned = auth.clone();

        // libgit2 has no per-call deadline, so a stalled connection is left
        // behind on its own thread.
        thread::Builder::new()
            .name(format!("ls-remote-{}", remote.name))
            .spawn(move || {
                let _ = tx.send(list_blocking(&url_owned, &auth_owned));
            })
            .map_err(|e| SweepError::remote_unreachable(remote.name.as_str(), e.to_string()))?;

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(refs)) => {
                debug!("Remote '{}' advertised {} references", remote.name, refs.len());
                Ok(refs)
            }
            Ok(Err(e)) => Err(SweepError::remote_unreachable(
                remote.name.as_str(),
                e.message().to_string(),
            )),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(SweepError::remote_unreachable(
                remote.name.as_str(),
                format!("listing timed out after {}s", self.timeout.as_secs()),
            )),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(SweepError::remote_unreachable(
                remote.name.as_str(),
                "listing thread exited without a result",
            )),
        }
    }
}

fn list_blocking(
    url: &str,
    auth: &Authentication,
) -> std::result::Result<Vec<RemoteRef>, git2::Error> {
    let mut remote = git2::Remote::create_detached(url)?;

    let mut callbacks = RemoteCallbacks::new();
    if let Authentication::Credential(credential) = auth {
        let mut attempted = false;
        callbacks.credentials(move |_url, _username_from_url, allowed| {
            if allowed.contains(CredentialType::USERNAME) {
                return git2::Cred::username(credential.username());
            }
            // No retries: a rejected credential fails the listing.
            if attempted {
                return Err(git2::Error::from_str("credential rejected by remote"));
            }
            attempted = true;
            trace!("Offering {:?} for {:?}", credential, allowed);
            credential.to_git2(allowed)
        });
    }

    let connection = remote.connect_auth(Direction::Fetch, Some(callbacks), None)?;
    let refs = connection
        .list()?
        .iter()
        .map(|head| RemoteRef::new(head.name(), head.oid()))
        .collect();
    Ok(refs)
}

/// Lists from already-fetched `refs/remotes/<remote>/*` instead of the network.
///
/// Names are reported as `refs/heads/<branch>` so they compare equal to a
/// tracking entry's merge ref.
#[derive(Debug, Clone)]
pub struct RemoteTrackingLister {
    git_dir: PathBuf,
}

impl RemoteTrackingLister {
    pub fn new(git_dir: impl Into<PathBuf>) -> Self {
        Self {
            git_dir: git_dir.into(),
        }
    }
}

impl RemoteLister for RemoteTrackingLister {
    fn list(
        &self,
        remote: &RemoteSpec,
        _url: &str,
        _auth: &Authentication,
    ) -> Result<Vec<RemoteRef>> {
        let repo = Repository::open(&self.git_dir)?;
        let prefix = format!("refs/remotes/{}/", remote.name);
        let mut refs = Vec::new();

        for reference in repo.references_glob(&format!("{}*", prefix))? {
            let reference = reference?;
            let (Some(name), Some(target)) = (reference.name(), reference.target()) else {
                continue;
            };
            if let Some(rest) = name.strip_prefix(&prefix) {
                refs.push(RemoteRef::new(format!("refs/heads/{}", rest), target));
            }
        }

        debug!(
            "Found {} remote-tracking references for '{}'",
            refs.len(),
            remote.name
        );
        Ok(refs)
    }

    fn needs_credentials(&self) -> bool {
        false
    }
}
