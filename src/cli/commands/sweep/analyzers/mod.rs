mod direct_merge_analyzer;
mod gerrit_merge_analyzer;
mod orphaned_tracking_analyzer;

pub use direct_merge_analyzer::DirectMergeAnalyzer;
pub use gerrit_merge_analyzer::GerritMergeAnalyzer;
pub use orphaned_tracking_analyzer::{OrphanedTrackingAnalyzer, TrackingBranch};

use crate::core::git::GitService;
use crate::utils::Result;
use std::collections::BTreeMap;
use std::fmt;

/// A read-only detector producing deletion candidates.
///
/// Analyzers are shared across threads; each call receives its own
/// repository handle.
pub trait CleanupAnalyzer: Send + Sync {
    fn analyze(&self, git: &GitService) -> Result<Vec<Candidate>>;
    fn description(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Detector {
    OrphanedTracking,
    GerritMerged,
    DirectMerged,
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OrphanedTracking => "upstream gone",
            Self::GerritMerged => "change merged",
            Self::DirectMerged => "merged into mainline",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub detector: Detector,
}

impl Candidate {
    pub fn new(name: impl Into<String>, detector: Detector) -> Self {
        Self {
            name: name.into(),
            detector,
        }
    }
}

/// Union of all detectors' candidates, keyed by branch name.
#[derive(Debug, Default)]
pub struct CleanupPlan {
    branches: BTreeMap<String, Vec<Detector>>,
}

impl CleanupPlan {
    /// Builds the deletion set. The mainline branch is never part of it.
    pub fn new(candidates: Vec<Candidate>, mainline: Option<&str>) -> Self {
        let mut branches: BTreeMap<String, Vec<Detector>> = BTreeMap::new();

        for candidate in candidates {
            if Some(candidate.name.as_str()) == mainline {
                continue;
            }
            let detectors = branches.entry(candidate.name).or_default();
            if !detectors.contains(&candidate.detector) {
                detectors.push(candidate.detector);
                detectors.sort();
            }
        }

        Self { branches }
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Branch names in sorted order.
    pub fn branches(&self) -> impl Iterator<Item = &str> {
        self.branches.keys().map(String::as_str)
    }

    pub fn detectors_for(&self, branch: &str) -> &[Detector] {
        self.branches.get(branch).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.branches.contains_key(branch)
    }
}
