//! Tracing subscriber setup for host binaries

use tracing_subscriber::EnvFilter;

use handsync_core::{HandsyncError, HandsyncResult};

/// Filter from `RUST_LOG`, or `default_directives` when unset or invalid
pub fn build_filter(default_directives: &str) -> HandsyncResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .map_err(|e| HandsyncError::InvalidConfig(format!("log filter: {}", e)))
}

/// Install the global fmt subscriber
///
/// Fails instead of panicking when a global subscriber is already set.
pub fn init_tracing(default_directives: &str) -> HandsyncResult<()> {
    let filter = build_filter(default_directives)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| HandsyncError::InvalidConfig(format!("tracing already initialised: {}", e)))
}
