pub mod analyzers;
pub mod reporter;
pub mod strategies;

pub use analyzers::{
    Candidate, CleanupAnalyzer, CleanupPlan, DirectMergeAnalyzer, GerritMergeAnalyzer,
    OrphanedTrackingAnalyzer,
};
pub use reporter::CleanupReporter;
pub use strategies::{CleanupResults, CleanupStrategy};

use crate::config::{Config, RemoteLookup};
use crate::core::auth::CredentialResolver;
use crate::core::git::GitService;
use crate::core::remote::{Git2RemoteLister, RemoteLister, RemoteRefCache, RemoteTrackingLister};
use crate::utils::{Result, SweepError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

/// Outcome of one sweep.
#[derive(Debug)]
pub struct SweepReport {
    pub mainline: Option<String>,
    /// Union of all detectors' candidates, sorted.
    pub candidates: Vec<String>,
    pub results: CleanupResults,
    /// Detectors that aborted. Their candidates are missing from the run.
    pub failures: Vec<SweepError>,
}

impl SweepReport {
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn execute(config: Config, dry_run: bool) -> Result<()> {
    let git_service = GitService::discover()?;
    let report = run(&git_service, &config, dry_run)?;

    CleanupReporter::new().show_results(&report.results);
    if !report.results.is_dry_run {
        info!("deleted {} branch(es)", report.results.deleted.len());
    }

    match report.failures.into_iter().next() {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

/// Runs every detector, unions their candidates and applies the strategy.
///
/// A detector that aborts does not prevent the others' candidates from being
/// processed; its error is returned in the report.
pub fn run(git_service: &GitService, config: &Config, dry_run: bool) -> Result<SweepReport> {
    let refs = remote_ref_cache(git_service, config);
    run_with_cache(git_service, config, dry_run, refs)
}

/// Like [`run`], with the reference cache supplied by the caller. A cache that
/// could not be built only disables orphan detection.
pub fn run_with_cache(
    git_service: &GitService,
    config: &Config,
    dry_run: bool,
    refs: Result<RemoteRefCache>,
) -> Result<SweepReport> {
    let mainline = git_service.resolve_mainline(config.mainline_override())?;

    let mut failures = Vec::new();
    let mut analyzers: Vec<Box<dyn CleanupAnalyzer>> = Vec::new();
    match refs {
        Ok(refs) => analyzers.push(Box::new(OrphanedTrackingAnalyzer::new(Arc::new(refs)))),
        Err(e) => {
            error!("Skipping upstream detection: {}", e);
            failures.push(e);
        }
    }
    analyzers.push(Box::new(GerritMergeAnalyzer::new(mainline.clone())));
    analyzers.push(Box::new(DirectMergeAnalyzer::new(mainline.clone())));

    let mut candidates = Vec::new();
    for (analyzer, outcome) in analyzers.iter().zip(run_analyzers(git_service, &analyzers)) {
        match outcome {
            Ok(found) => {
                debug!("{}: {} candidate(s)", analyzer.description(), found.len());
                candidates.extend(found);
            }
            Err(e) => {
                error!("{} failed: {}", analyzer.description(), e);
                failures.push(e);
            }
        }
    }

    let plan = CleanupPlan::new(candidates, mainline.as_deref());
    let results = CleanupStrategy::from_dry_run(dry_run).execute(&plan, git_service);

    Ok(SweepReport {
        mainline,
        candidates: plan.branches().map(str::to_string).collect(),
        results,
        failures,
    })
}

/// Detectors are read-only, so each runs on its own thread with its own
/// repository handle.
fn run_analyzers(
    git_service: &GitService,
    analyzers: &[Box<dyn CleanupAnalyzer>],
) -> Vec<Result<Vec<Candidate>>> {
    thread::scope(|scope| {
        let handles: Vec<_> = analyzers
            .iter()
            .map(|analyzer| {
                let handle = git_service.reopen();
                scope.spawn(move || {
                    let git = handle?;
                    analyzer.analyze(&git)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}

fn remote_ref_cache(git_service: &GitService, config: &Config) -> Result<RemoteRefCache> {
    let resolver = CredentialResolver::from_environment(&config.credentials)?;
    let lister: Arc<dyn RemoteLister> = match config.remote_lookup() {
        RemoteLookup::Network => Arc::new(Git2RemoteLister::new(config.list_timeout())),
        RemoteLookup::RemoteTracking => Arc::new(RemoteTrackingLister::new(
            &git_service.repository().git_dir,
        )),
    };
    Ok(RemoteRefCache::new(resolver, lister))
}
