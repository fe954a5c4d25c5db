use super::analyzers::CleanupPlan;
use crate::core::git::GitService;
use crate::utils::SweepError;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStrategy {
    DryRun,
    Live,
}

impl CleanupStrategy {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else {
            Self::Live
        }
    }

    /// Applies the plan one branch at a time.
    ///
    /// Every failure is recorded against its branch and the remaining
    /// branches are still processed.
    pub fn execute(&self, plan: &CleanupPlan, git: &GitService) -> CleanupResults {
        let mut results = CleanupResults {
            is_dry_run: *self == Self::DryRun,
            ..Default::default()
        };

        for branch in plan.branches() {
            match self {
                Self::DryRun => results.would_delete.push(branch.to_string()),
                Self::Live => Self::delete(branch, git, &mut results),
            }
        }

        results
    }

    fn delete(branch: &str, git: &GitService, results: &mut CleanupResults) {
        match git.delete_branch(branch) {
            Ok(()) => {
                debug!("Deleted branch '{}'", branch);
                results.deleted.push(branch.to_string());
            }
            Err(e) => {
                let e = if e.is_per_branch() {
                    e
                } else {
                    SweepError::deletion_failed(branch, e.to_string())
                };
                results.errors.push(e);
                return;
            }
        }

        if let Err(e) = git.remove_branch_config(branch) {
            warn!("{}", e);
            results.warnings.push(e);
        }
    }
}

#[derive(Debug, Default)]
pub struct CleanupResults {
    pub would_delete: Vec<String>,
    pub deleted: Vec<String>,
    /// Branches deleted whose config could not be cleaned up.
    pub warnings: Vec<SweepError>,
    pub errors: Vec<SweepError>,
    pub is_dry_run: bool,
}

impl CleanupResults {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
