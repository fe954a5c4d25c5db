use super::repository::GitRepository;
use crate::utils::error::{Result, SweepError};
use git2::{BranchType, ConfigLevel, ErrorCode, Oid};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: String,
    pub target: Oid,
}

pub struct BranchManager<'a> {
    repo: &'a GitRepository,
}

impl<'a> BranchManager<'a> {
    pub fn new(repo: &'a GitRepository) -> Self {
        Self { repo }
    }

    /// Local branches with a direct commit target, sorted by name.
    pub fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        let mut branches = Vec::new();

        for entry in self.repo.inner().branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()? else {
                debug!("Skipping branch with non UTF-8 name");
                continue;
            };
            let Some(target) = branch.get().target() else {
                debug!("Skipping symbolic branch {}", name);
                continue;
            };
            branches.push(BranchInfo {
                name: name.to_string(),
                target,
            });
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    /// Removes `refs/heads/<name>`. Refuses to remove the checked-out branch.
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        if self.repo.get_current_branch()?.as_deref() == Some(name) {
            return Err(SweepError::deletion_failed(
                name,
                "cannot delete the currently checked out branch",
            ));
        }

        let ref_name = format!("refs/heads/{}", name);
        let mut reference = self
            .repo
            .inner()
            .find_reference(&ref_name)
            .map_err(|e| SweepError::deletion_failed(name, e.message()))?;
        reference
            .delete()
            .map_err(|e| SweepError::deletion_failed(name, e.message()))
    }

    /// Drops every `branch.<name>.*` key from the repository-local config.
    ///
    /// Each removal is written to disk immediately by libgit2. A branch with no
    /// config section is a no-op.
    pub fn remove_branch_config(&self, name: &str) -> Result<()> {
        let persist_err = |e: git2::Error| SweepError::config_persist_failed(name, e.message());

        let mut local = self
            .repo
            .inner()
            .config()
            .and_then(|config| config.open_level(ConfigLevel::Local))
            .map_err(persist_err)?;

        let mut keys = Vec::new();
        {
            let mut iter = local.entries(Some(r"^branch\.")).map_err(persist_err)?;
            while let Some(entry) = iter.next() {
                let entry = entry.map_err(persist_err)?;
                let Some(key) = entry.name() else {
                    continue;
                };
                let section = key
                    .strip_prefix("branch.")
                    .and_then(|rest| rest.rsplit_once('.'))
                    .map(|(branch, _)| branch);
                if section == Some(name) {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort();
        keys.dedup();

        for key in &keys {
            match local.remove_multivar(key, ".*") {
                Ok(()) => {}
                Err(e) if e.code() == ErrorCode::NotFound => {}
                Err(e) => return Err(persist_err(e)),
            }
        }

        debug!("Removed {} config keys for branch {}", keys.len(), name);
        Ok(())
    }
}
