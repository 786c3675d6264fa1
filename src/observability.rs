//! Logging initialization.

use tracing_subscriber::EnvFilter;

/// Environment variable controlling the log filter.
pub const LOG_ENV_VAR: &str = "STALESWEEP_LOG";

/// Initializes the tracing subscriber.
///
/// The filter comes from `STALESWEEP_LOG` when set, otherwise defaults to
/// `debug` when verbose output was requested and `info` otherwise. Logs go
/// to stderr so stdout stays reserved for the branch list. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
