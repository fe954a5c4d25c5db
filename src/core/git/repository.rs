use crate::utils::error::{Result, SweepError};
use git2::{BranchType, ErrorCode, Oid, Repository};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-branch `[branch "<name>"]` section of the repository config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingConfigEntry {
    pub branch: String,
    pub remote: Option<String>,
    pub merge: Option<String>,
}

impl TrackingConfigEntry {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            remote: None,
            merge: None,
        }
    }

    /// Returns `(remote, merge)` when both are configured and non-empty.
    pub fn upstream(&self) -> Option<(&str, &str)> {
        match (self.remote.as_deref(), self.merge.as_deref()) {
            (Some(remote), Some(merge)) if !remote.is_empty() && !merge.is_empty() => {
                Some((remote, merge))
            }
            _ => None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.upstream().is_some()
    }
}

pub struct GitRepository {
    pub root: PathBuf,
    pub git_dir: PathBuf,
    repo: Repository,
}

impl GitRepository {
    pub fn discover() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Opens the repository containing `path`, searching parent directories upward.
    pub fn discover_from(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                SweepError::repository_not_found(path.display().to_string())
            } else {
                SweepError::Git(e)
            }
        })?;
        Ok(Self::from_handle(repo))
    }

    pub fn open(git_dir: &Path) -> Result<Self> {
        let repo = Repository::open(git_dir)?;
        Ok(Self::from_handle(repo))
    }

    /// A fresh handle on the same repository, for use on another thread.
    pub fn reopen(&self) -> Result<Self> {
        Self::open(&self.git_dir)
    }

    fn from_handle(repo: Repository) -> Self {
        let git_dir = repo.path().to_path_buf();
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| git_dir.clone());
        Self {
            root,
            git_dir,
            repo,
        }
    }

    pub fn inner(&self) -> &Repository {
        &self.repo
    }

    /// The branch HEAD points to, if HEAD is attached.
    pub fn get_current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.find_reference("HEAD") {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(head
            .symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string))
    }

    /// Detects the mainline branch: local `main`, then the branch
    /// `origin/HEAD` names, then local `master`.
    pub fn get_main_branch(&self) -> Result<Option<String>> {
        if self.local_branch_exists("main")? {
            return Ok(Some("main".to_string()));
        }

        if let Ok(origin_head) = self.repo.find_reference("refs/remotes/origin/HEAD") {
            if let Some(name) = origin_head
                .symbolic_target()
                .and_then(|target| target.strip_prefix("refs/remotes/origin/"))
            {
                if self.local_branch_exists(name)? {
                    return Ok(Some(name.to_string()));
                }
            }
        }

        if self.local_branch_exists("master")? {
            return Ok(Some("master".to_string()));
        }

        Ok(None)
    }

    pub fn local_branch_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) if e.code() == ErrorCode::InvalidSpec => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn reference_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) if e.code() == ErrorCode::InvalidSpec => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn branch_tip(&self, name: &str) -> Result<Oid> {
        let branch = self.repo.find_branch(name, BranchType::Local)?;
        branch.get().peel_to_commit().map(|c| c.id()).map_err(Into::into)
    }

    pub fn commit_message(&self, oid: Oid) -> Result<String> {
        let commit = self.repo.find_commit(oid)?;
        Ok(commit.message().unwrap_or_default().to_string())
    }

    /// Reads every `branch.<name>.remote` / `branch.<name>.merge` pair.
    ///
    /// Entries are keyed by branch name; branch names may contain dots, so the
    /// variable name is split off the right-hand end.
    pub fn tracking_entries(&self) -> Result<Vec<TrackingConfigEntry>> {
        let mut config = self
            .repo
            .config()
            .map_err(|e| SweepError::config_unavailable(format!("could not get git config: {}", e)))?;
        let snapshot = config
            .snapshot()
            .map_err(|e| SweepError::config_unavailable(format!("could not read git config: {}", e)))?;

        let mut entries: BTreeMap<String, TrackingConfigEntry> = BTreeMap::new();
        let mut iter = snapshot
            .entries(Some(r"^branch\..*\.(remote|merge)$"))
            .map_err(|e| SweepError::config_unavailable(format!("could not list git config: {}", e)))?;

        while let Some(entry) = iter.next() {
            let entry = entry.map_err(|e| {
                SweepError::config_unavailable(format!("could not read git config entry: {}", e))
            })?;
            let (Some(name), Some(value)) = (entry.name(), entry.value()) else {
                continue;
            };
            let Some((branch, variable)) = name
                .strip_prefix("branch.")
                .and_then(|rest| rest.rsplit_once('.'))
            else {
                continue;
            };

            let slot = entries
                .entry(branch.to_string())
                .or_insert_with(|| TrackingConfigEntry::new(branch));
            match variable.to_ascii_lowercase().as_str() {
                "remote" => slot.remote = Some(value.to_string()),
                "merge" => slot.merge = Some(value.to_string()),
                _ => {}
            }
        }

        debug!("Found {} branch config sections", entries.len());
        Ok(entries.into_values().collect())
    }
}
