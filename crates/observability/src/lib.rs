//! Logging setup shared by the host binaries.
//!
//! The core crates only *emit* via `tracing`; installing a subscriber is
//! the host's call, and this crate is the one place that does it.

use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Install the process-wide tracing subscriber.
///
/// Filtering follows `RUST_LOG`; output is line-delimited JSON so the
/// desktop host can ship logs without a parsing step. Calling this more
/// than once is harmless — later calls lose the `set_global_default`
/// race and become no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
