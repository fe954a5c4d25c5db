use crate::core::remote::RemoteSpec;
use crate::utils::error::Result;
use std::path::Path;
use tracing::{debug, warn};

pub mod branch;
pub mod change_id;
pub mod repository;

pub use branch::{BranchInfo, BranchManager};
pub use change_id::ChangeId;
pub use repository::{GitRepository, TrackingConfigEntry};

pub struct GitService {
    repo: GitRepository,
}

impl GitService {
    pub fn discover() -> Result<Self> {
        let repo = GitRepository::discover()?;
        Ok(Self { repo })
    }

    pub fn discover_from(path: &Path) -> Result<Self> {
        let repo = GitRepository::discover_from(path)?;
        Ok(Self { repo })
    }

    /// A second service on the same repository; handles are not shareable across threads.
    pub fn reopen(&self) -> Result<Self> {
        let repo = self.repo.reopen()?;
        Ok(Self { repo })
    }

    pub fn repository(&self) -> &GitRepository {
        &self.repo
    }

    pub fn branch_manager(&self) -> BranchManager {
        BranchManager::new(&self.repo)
    }

    pub fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        self.branch_manager().list_branches()
    }

    pub fn tracking_entries(&self) -> Result<Vec<TrackingConfigEntry>> {
        self.repo.tracking_entries()
    }

    /// Resolves the mainline branch name, honoring an explicit override.
    ///
    /// Returns `None` when the override names a missing branch or nothing can
    /// be detected.
    pub fn resolve_mainline(&self, override_name: Option<&str>) -> Result<Option<String>> {
        if let Some(name) = override_name {
            if self.repo.local_branch_exists(name)? {
                return Ok(Some(name.to_string()));
            }
            warn!("Configured mainline branch '{}' does not exist", name);
            return Ok(None);
        }

        let detected = self.repo.get_main_branch()?;
        match &detected {
            Some(name) => debug!("Detected mainline branch '{}'", name),
            None => warn!("Could not detect a mainline branch (tried main, origin/HEAD, master)"),
        }
        Ok(detected)
    }

    /// Looks up a configured remote. Any lookup failure means "not configured".
    pub fn find_remote(&self, name: &str) -> Option<RemoteSpec> {
        match self.repo.inner().find_remote(name) {
            Ok(remote) => Some(RemoteSpec::new(name, remote.url().map(str::to_string))),
            Err(e) => {
                debug!("Remote '{}' does not resolve: {}", name, e.message());
                None
            }
        }
    }

    pub fn delete_branch(&self, name: &str) -> Result<()> {
        self.branch_manager().delete_branch(name)
    }

    pub fn remove_branch_config(&self, name: &str) -> Result<()> {
        self.branch_manager().remove_branch_config(name)
    }
}
