//! Logging infrastructure for northboard
//!
//! The pipeline runs once and exits, so logs go to stderr rather than a
//! rotating file; `RUST_LOG` overrides the configured level.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Initialize the logging system.
///
/// Level comes from `RUST_LOG` when set, otherwise from the config.
/// Safe to call once per process; later calls are ignored.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

/// Initialize logging for tests (logs to the test writer)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
