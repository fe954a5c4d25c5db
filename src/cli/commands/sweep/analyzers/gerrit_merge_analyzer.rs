use super::{Candidate, CleanupAnalyzer, Detector};
use crate::core::git::{ChangeId, GitService};
use crate::utils::{Result, SweepError};
use git2::{Oid, Sort};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Flags branches whose tip carries a Change-Id already present on mainline.
pub struct GerritMergeAnalyzer {
    mainline: Option<String>,
}

impl GerritMergeAnalyzer {
    pub fn new(mainline: Option<String>) -> Self {
        Self { mainline }
    }

    /// Change-Ids found on mainline, mapped to the newest commit carrying each.
    fn mainline_change_ids(&self, git: &GitService, mainline: &str) -> Result<HashMap<ChangeId, Oid>> {
        let repo = git.repository();
        let walk_error = |e: git2::Error| SweepError::ancestry_walk(mainline, e.message());

        let tip = repo.branch_tip(mainline)?;
        let mut revwalk = repo.inner().revwalk().map_err(walk_error)?;
        revwalk.set_sorting(Sort::TIME).map_err(walk_error)?;
        revwalk.push(tip).map_err(walk_error)?;

        let mut index = HashMap::new();
        for oid in revwalk {
            let oid = oid.map_err(walk_error)?;
            let message = repo.commit_message(oid)?;
            if let Some(change_id) = ChangeId::from_message(&message) {
                index.entry(change_id).or_insert(oid);
            }
        }

        debug!("Indexed {} change ids on '{}'", index.len(), mainline);
        Ok(index)
    }

    fn branch_change_id(git: &GitService, branch: &str, tip: Oid) -> Option<ChangeId> {
        match git.repository().commit_message(tip) {
            Ok(message) => ChangeId::from_message(&message),
            Err(e) => {
                warn!("Skipping '{}': could not read its tip commit: {}", branch, e);
                None
            }
        }
    }
}

impl CleanupAnalyzer for GerritMergeAnalyzer {
    fn analyze(&self, git: &GitService) -> Result<Vec<Candidate>> {
        let Some(mainline) = self.mainline.as_deref() else {
            warn!("No mainline branch; skipping Change-Id detection");
            return Ok(Vec::new());
        };

        let reviewed: Vec<(String, ChangeId)> = git
            .list_branches()?
            .into_iter()
            .filter(|branch| branch.name != mainline)
            .filter_map(|branch| {
                Self::branch_change_id(git, &branch.name, branch.target)
                    .map(|change_id| (branch.name, change_id))
            })
            .collect();

        if reviewed.is_empty() {
            return Ok(Vec::new());
        }

        let index = match self.mainline_change_ids(git, mainline) {
            Ok(index) => index,
            Err(e) => {
                warn!("Skipping Change-Id detection: {}", e);
                return Ok(Vec::new());
            }
        };

        let candidates = reviewed
            .into_iter()
            .filter_map(|(name, change_id)| {
                let merged_as = index.get(&change_id)?;
                debug!("Branch '{}' ({}) landed as {}", name, change_id, merged_as);
                Some(Candidate::new(name, Detector::GerritMerged))
            })
            .collect();

        Ok(candidates)
    }

    fn description(&self) -> &'static str {
        "Finds review branches whose Change-Id is on mainline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::*;

    const MESSAGE: &str = "Fix bug\n\nChange-Id: Iabc123def4567890";

    fn names(candidates: Vec<Candidate>) -> Vec<String> {
        candidates.into_iter().map(|c| c.name).collect()
    }

    #[test]
    fn test_detects_landed_change() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        create_branch(repo, "review-1", "main");
        commit_on_branch(repo, "review-1", MESSAGE);

        // The mainline copy has a different parent, as after a rebase.
        commit_on_branch(repo, "main", "Unrelated work");
        commit_on_branch(repo, "main", MESSAGE);
        commit_on_branch(repo, "main", "Later work");

        let analyzer = GerritMergeAnalyzer::new(Some("main".to_string()));
        assert_eq!(
            names(analyzer.analyze(&service).unwrap()),
            vec!["review-1".to_string()]
        );
    }

    #[test]
    fn test_unlanded_change_is_kept() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        create_branch(repo, "review-2", "main");
        commit_on_branch(repo, "review-2", "Wip\n\nChange-Id: I0123456789abcdef");
        commit_on_branch(repo, "main", MESSAGE);

        let analyzer = GerritMergeAnalyzer::new(Some("main".to_string()));
        assert!(analyzer.analyze(&service).unwrap().is_empty());
    }

    #[test]
    fn test_short_change_id_is_ignored() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        create_branch(repo, "short", "main");
        commit_on_branch(repo, "short", "Tiny\n\nChange-Id: Iabc123");
        commit_on_branch(repo, "main", "Other\n\nChange-Id: Iabc123");

        let analyzer = GerritMergeAnalyzer::new(Some("main".to_string()));
        assert!(analyzer.analyze(&service).unwrap().is_empty());
    }

    #[test]
    fn test_branch_without_change_id() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        create_branch(repo, "noop", "main");
        commit_on_branch(repo, "noop", "Plain commit");

        let analyzer = GerritMergeAnalyzer::new(Some("main".to_string()));
        assert!(analyzer.analyze(&service).unwrap().is_empty());
    }

    #[test]
    fn test_mainline_itself_is_excluded() {
        let (_temp_dir, service) = setup_test_service();
        commit_on_branch(service.repository(), "main", MESSAGE);

        let analyzer = GerritMergeAnalyzer::new(Some("main".to_string()));
        assert!(analyzer.analyze(&service).unwrap().is_empty());
    }

    #[test]
    fn test_missing_mainline_yields_nothing() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        create_branch(repo, "review-1", "main");
        commit_on_branch(repo, "review-1", MESSAGE);

        assert!(GerritMergeAnalyzer::new(None)
            .analyze(&service)
            .unwrap()
            .is_empty());
        assert!(GerritMergeAnalyzer::new(Some("trunk".to_string()))
            .analyze(&service)
            .unwrap()
            .is_empty());
    }
}
