//! Logging setup for the binary.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV_VAR: &str = "GIT_SWEEP_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing for the application.
///
/// Logs go to stderr so that stdout carries only the dry-run report.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    debug!("git-sweep {} started", env!("CARGO_PKG_VERSION"));
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
