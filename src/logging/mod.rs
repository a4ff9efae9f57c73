//! Logging setup
//!
//! Output verbosity follows the command-line flags: `--quiet` keeps errors
//! only, `--verbose` adds per-request debug output. `RUST_LOG` takes
//! precedence when set.

use tracing_subscriber::EnvFilter;

/// Default filter directive for the given verbosity flags
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, true) => "registry_hub=debug,info",
        (false, false) => "info",
    }
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .try_init();
}
