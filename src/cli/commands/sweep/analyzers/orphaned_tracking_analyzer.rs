use super::{Candidate, CleanupAnalyzer, Detector};
use crate::core::git::{GitService, TrackingConfigEntry};
use crate::core::remote::{RemoteRef, RemoteRefCache, RemoteSpec};
use crate::utils::{Result, SweepError};
use std::sync::Arc;
use tracing::debug;

/// Remote name git uses for an upstream inside the same repository.
const LOCAL_REMOTE: &str = ".";

/// Resolution of one tracking entry against its remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingBranch {
    pub name: String,
    /// `None` when the configured remote no longer exists.
    pub remote: Option<RemoteSpec>,
    /// `None` when the remote does not have the tracked reference.
    pub remote_ref: Option<RemoteRef>,
}

impl TrackingBranch {
    pub fn is_orphaned(&self) -> bool {
        self.remote.is_none() || self.remote_ref.is_none()
    }
}

pub struct OrphanedTrackingAnalyzer {
    refs: Arc<RemoteRefCache>,
}

impl OrphanedTrackingAnalyzer {
    pub fn new(refs: Arc<RemoteRefCache>) -> Self {
        Self { refs }
    }

    /// Resolves every tracking entry that belongs to an existing local branch.
    pub fn tracking_branches(&self, git: &GitService) -> Result<Vec<TrackingBranch>> {
        let mut resolved = Vec::new();

        for entry in git.tracking_entries()? {
            let Some((remote_name, merge)) = entry.upstream() else {
                continue;
            };
            if !git.repository().local_branch_exists(&entry.branch)? {
                debug!(
                    "Skipping tracking config for missing branch '{}'",
                    entry.branch
                );
                continue;
            }
            resolved.push(self.resolve(git, &entry, remote_name, merge)?);
        }

        Ok(resolved)
    }

    fn resolve(
        &self,
        git: &GitService,
        entry: &TrackingConfigEntry,
        remote_name: &str,
        merge: &str,
    ) -> Result<TrackingBranch> {
        let name = entry.branch.clone();

        if remote_name == LOCAL_REMOTE {
            let remote_ref = git
                .repository()
                .inner()
                .refname_to_id(merge)
                .ok()
                .map(|target| RemoteRef::new(merge, target));
            return Ok(TrackingBranch {
                name,
                remote: Some(RemoteSpec::new(LOCAL_REMOTE, None)),
                remote_ref,
            });
        }

        let Some(remote) = git.find_remote(remote_name) else {
            debug!(
                "Branch '{}' tracks unknown remote '{}'",
                entry.branch, remote_name
            );
            return Ok(TrackingBranch {
                name,
                remote: None,
                remote_ref: None,
            });
        };

        let remote_ref = self
            .refs
            .find_ref(&remote, merge)
            .map_err(|e| SweepError::reference_loader(entry.branch.as_str(), e))?;

        Ok(TrackingBranch {
            name,
            remote: Some(remote),
            remote_ref,
        })
    }
}

impl CleanupAnalyzer for OrphanedTrackingAnalyzer {
    fn analyze(&self, git: &GitService) -> Result<Vec<Candidate>> {
        let candidates = self
            .tracking_branches(git)?
            .into_iter()
            .filter(TrackingBranch::is_orphaned)
            .map(|branch| {
                debug!("Branch '{}' lost its upstream", branch.name);
                Candidate::new(branch.name, Detector::OrphanedTracking)
            })
            .collect();
        Ok(candidates)
    }

    fn description(&self) -> &'static str {
        "Finds tracking branches whose upstream reference is gone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_credential_config;
    use crate::core::auth::CredentialResolver;
    use crate::core::remote::{Git2RemoteLister, RemoteTrackingLister};
    use crate::test_utils::test_helpers::*;
    use std::time::Duration;

    fn network_cache() -> Arc<RemoteRefCache> {
        let resolver =
            CredentialResolver::new("/nonexistent-home", "tester", None, default_credential_config());
        Arc::new(RemoteRefCache::new(
            resolver,
            Arc::new(Git2RemoteLister::new(Duration::from_secs(30))),
        ))
    }

    fn names(candidates: Vec<Candidate>) -> Vec<String> {
        candidates.into_iter().map(|c| c.name).collect()
    }

    #[test]
    fn test_detects_vanished_upstream() {
        let (_temp_dir, service) = setup_test_service();
        let remote_dir = setup_bare_remote();
        create_remote_branch(remote_dir.path(), "kept");
        let repo = service.repository();
        add_remote(repo, "origin", &remote_dir.path().to_string_lossy());

        create_branch(repo, "feature-x", "main");
        set_tracking(repo, "feature-x", "origin", "refs/heads/old-feature");
        create_branch(repo, "kept", "main");
        set_tracking(repo, "kept", "origin", "refs/heads/kept");
        create_branch(repo, "untracked", "main");

        let analyzer = OrphanedTrackingAnalyzer::new(network_cache());
        let candidates = names(analyzer.analyze(&service).unwrap());

        assert_eq!(candidates, vec!["feature-x".to_string()]);
    }

    #[test]
    fn test_unknown_remote_is_orphaned_without_network() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        create_branch(repo, "stale", "main");
        set_tracking(repo, "stale", "removed-remote", "refs/heads/stale");

        let analyzer = OrphanedTrackingAnalyzer::new(network_cache());
        let branches = analyzer.tracking_branches(&service).unwrap();

        assert_eq!(branches.len(), 1);
        assert!(branches[0].remote.is_none());
        assert!(branches[0].is_orphaned());
    }

    #[test]
    fn test_local_upstream() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        create_branch(repo, "follows-main", "main");
        set_tracking(repo, "follows-main", ".", "refs/heads/main");
        create_branch(repo, "follows-gone", "main");
        set_tracking(repo, "follows-gone", ".", "refs/heads/deleted");

        let analyzer = OrphanedTrackingAnalyzer::new(network_cache());
        let candidates = names(analyzer.analyze(&service).unwrap());

        assert_eq!(candidates, vec!["follows-gone".to_string()]);
    }

    #[test]
    fn test_config_for_missing_branch_is_skipped() {
        let (_temp_dir, service) = setup_test_service();
        set_tracking(service.repository(), "ghost", "nowhere", "refs/heads/ghost");

        let analyzer = OrphanedTrackingAnalyzer::new(network_cache());
        assert!(analyzer.analyze(&service).unwrap().is_empty());
    }

    #[test]
    fn test_listing_failure_aborts_detector() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        let missing = tempfile::TempDir::new().unwrap();
        add_remote(
            repo,
            "origin",
            &missing.path().join("gone.git").to_string_lossy(),
        );
        create_branch(repo, "feature", "main");
        set_tracking(repo, "feature", "origin", "refs/heads/feature");

        let analyzer = OrphanedTrackingAnalyzer::new(network_cache());
        let result = analyzer.analyze(&service);

        assert!(matches!(result, Err(SweepError::ReferenceLoader { .. })));
    }

    #[test]
    fn test_remote_tracking_lookup() {
        let (_temp_dir, service) = setup_test_service();
        let repo = service.repository();
        add_remote(repo, "origin", "https://example.com/repo.git");
        let tip = create_branch(repo, "fetched", "main");
        set_tracking(repo, "fetched", "origin", "refs/heads/fetched");
        create_branch(repo, "pruned", "main");
        set_tracking(repo, "pruned", "origin", "refs/heads/pruned");
        repo.inner()
            .reference("refs/remotes/origin/fetched", tip, false, "test")
            .unwrap();

        let resolver =
            CredentialResolver::new("/nonexistent-home", "tester", None, default_credential_config());
        let cache = Arc::new(RemoteRefCache::new(
            resolver,
            Arc::new(RemoteTrackingLister::new(&repo.git_dir)),
        ));
        let analyzer = OrphanedTrackingAnalyzer::new(cache);
        let candidates = names(analyzer.analyze(&service).unwrap());

        assert_eq!(candidates, vec!["pruned".to_string()]);
    }
}
