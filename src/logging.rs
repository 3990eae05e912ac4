//! Diagnostic logging.
//!
//! Diagnostics go to stderr so they never interleave with the conversation on
//! stdout. `RUST_LOG` selects the filter; the default only shows warnings.

use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
