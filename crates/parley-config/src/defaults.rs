//! Default values shared by the binaries.

use crate::endpoint::ListenEndpoint;

/// Default TCP port the daemon listens on.
pub const DEFAULT_PORT: u16 = 12345;

/// Default host interface the daemon binds to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default watcher polling interval in milliseconds.
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 1000;

/// Computes the default listen endpoint for the daemon.
#[must_use]
pub fn default_listen_endpoint() -> ListenEndpoint {
    ListenEndpoint::new(DEFAULT_HOST, DEFAULT_PORT)
}

/// Default log filter expression used by the binaries.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::default()
}
