use super::{Candidate, CleanupAnalyzer, Detector};
use crate::core::git::GitService;
use crate::utils::{Result, SweepError};
use git2::Oid;
use tracing::{debug, warn};

/// Flags branches whose tip is reachable from the mainline tip.
pub struct DirectMergeAnalyzer {
    mainline: Option<String>,
}

impl DirectMergeAnalyzer {
    pub fn new(mainline: Option<String>) -> Self {
        Self { mainline }
    }

    fn is_merged(git: &GitService, branch: &str, tip: Oid, mainline_tip: Oid) -> Result<bool> {
        if tip == mainline_tip {
            return Ok(true);
        }
        git.repository()
            .inner()
            .graph_descendant_of(mainline_tip, tip)
            .map_err(|e| SweepError::ancestry_walk(branch, e.message()))
    }
}

impl CleanupAnalyzer for DirectMergeAnalyzer {
    fn analyze(&self, git: &GitService) -> Result<Vec<Candidate>> {
        let Some(mainline) = self.mainline.as_deref() else {
            warn!("No mainline branch; skipping ancestry detection");
            return Ok(Vec::new());
        };

        let mainline_tip = match git.repository().branch_tip(mainline) {
            Ok(tip) => tip,
            Err(e) => {
                warn!("Skipping ancestry detection: cannot resolve '{}': {}", mainline, e);
                return Ok(Vec::new());
            }
        };

        let mut candidates = Vec::new();
        for branch in git.list_branches()? {
            if branch.name == mainline {
                continue;
            }
            match Self::is_merged(git, &branch.name, branch.target, mainline_tip) {
                Ok(true) => {
                    debug!("Branch '{}' is contained in '{}'", branch.name, mainline);
                    candidates.push(Candidate::new(branch.name, Detector::DirectMerged));
                }
                Ok(false) => {}
                Err(e) => warn!("Skipping '{}': {}", branch.name, e),
            }
        }

        Ok(candidates)
    }

    fn description(&self) -> &'static str {
        "Finds branches already contained in mainline"
    }
}
