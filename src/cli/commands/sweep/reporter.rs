use super::strategies::CleanupResults;
use std::io::{self, Write};

pub struct CleanupReporter;

impl CleanupReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn show_results(&self, results: &CleanupResults) {
        let stdout = io::stdout();
        let stderr = io::stderr();
        // Output is best effort; a closed pipe must not turn into a failed run.
        let _ = self.write_results(results, &mut stdout.lock(), &mut stderr.lock());
    }

    /// Dry-run lines go to `out`; deletion errors and warnings go to `err`.
    pub fn write_results(
        &self,
        results: &CleanupResults,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<()> {
        for branch in &results.would_delete {
            writeln!(out, "would delete {:?}", branch)?;
        }

        for error in &results.errors {
            writeln!(err, "error: {}", error)?;
        }

        for warning in &results.warnings {
            writeln!(err, "warning: {}", warning)?;
        }

        Ok(())
    }
}

impl Default for CleanupReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::SweepError;

    fn render(results: &CleanupResults) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        CleanupReporter::new()
            .write_results(results, &mut out, &mut err)
            .unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_dry_run_lines() {
        let results = CleanupResults {
            would_delete: vec!["feature-x".to_string(), "review-1".to_string()],
            is_dry_run: true,
            ..Default::default()
        };

        let (out, err) = render(&results);
        assert_eq!(out, "would delete \"feature-x\"\nwould delete \"review-1\"\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_live_success_is_silent() {
        let results = CleanupResults {
            deleted: vec!["feature-x".to_string()],
            ..Default::default()
        };

        let (out, err) = render(&results);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_errors_and_warnings_go_to_stderr() {
        let results = CleanupResults {
            deleted: vec!["stale".to_string()],
            errors: vec![SweepError::deletion_failed("work", "checked out")],
            warnings: vec![SweepError::config_persist_failed("stale", "locked")],
            ..Default::default()
        };

        let (out, err) = render(&results);
        assert!(out.is_empty());
        assert!(err.contains("error: Failed to delete branch 'work': checked out"));
        assert!(err.contains("warning: Branch 'stale' deleted but its config entry remains: locked"));
    }
}
