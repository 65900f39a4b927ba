//! Structured health reporting for daemon lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use camino::Utf8Path;

use parley_config::{Config, ListenEndpoint};

use crate::bootstrap::BootstrapError;

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once the listener is bound and accepting.
    fn listener_bound(&self, endpoint: &ListenEndpoint, addr: SocketAddr);

    /// Invoked when the stat watcher starts.
    fn watcher_started(&self, path: &Utf8Path);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn listener_bound(&self, endpoint: &ListenEndpoint, addr: SocketAddr) {
        (**self).listener_bound(endpoint, addr);
    }

    fn watcher_started(&self, path: &Utf8Path) {
        (**self).watcher_started(path);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: "parleyd::health",
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: "parleyd::health",
            event = "bootstrap_succeeded",
            listen = %config.listen(),
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: "parleyd::health",
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn listener_bound(&self, endpoint: &ListenEndpoint, addr: SocketAddr) {
        tracing::info!(
            target: "parleyd::health",
            event = "listener_bound",
            endpoint = %endpoint,
            addr = %addr,
            "command server accepting connections"
        );
    }

    fn watcher_started(&self, path: &Utf8Path) {
        tracing::info!(
            target: "parleyd::health",
            event = "watcher_started",
            path = %path,
            "stat watcher running"
        );
    }
}
