//! Tracing bootstrap for applications built on Courier.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,courier_http=debug";

/// Initialize a simple stdout tracing subscriber for development.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_stdout_tracing() {
    init_stdout_tracing_with(DEFAULT_FILTER);
}

pub fn init_stdout_tracing_with(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
}
