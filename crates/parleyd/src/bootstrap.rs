//! Daemon bootstrap and run orchestration.
//!
//! Bootstrap resolves configuration and installs telemetry, reporting each
//! stage through the injected [`HealthReporter`]. The resulting [`Daemon`]
//! runs the command server with an injected handler until a shutdown signal
//! arrives, then tears the listener and watcher down cooperatively.

use std::sync::Arc;

use thiserror::Error;

use parley_config::Config;

use crate::dispatch::CommandHandler;
use crate::health::HealthReporter;
use crate::server::{CommandServer, ListenerError};
use crate::shutdown::{ShutdownError, ShutdownSignal};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::watcher::{StatWatcher, WatcherError};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the argument-parsing error when the configuration is invalid.
    fn load(&self) -> Result<Config, clap::Error>;
}

/// Loader that delegates to [`Config::load`] (process arguments).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, clap::Error> {
        Config::load()
    }
}

/// Loader that returns a pre-resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already-resolved configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, clap::Error> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        #[source]
        source: clap::Error,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        #[source]
        source: TelemetryError,
    },
}

/// Errors surfaced while running the daemon after a successful bootstrap.
#[derive(Debug, Error)]
pub enum RunError {
    /// Bootstrap failed before the server could start.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The listener could not be started; fatal, the operator must fix the
    /// endpoint.
    #[error("failed to start command server: {0}")]
    Listener(#[from] ListenerError),
    /// Waiting for the shutdown signal failed.
    #[error("failed to wait for shutdown: {0}")]
    Shutdown(#[from] ShutdownError),
    /// The watcher thread ended abnormally.
    #[error("stat watcher failed: {0}")]
    Watcher(#[from] WatcherError),
}

/// Result of a successful bootstrap invocation.
pub struct Daemon {
    config: Config,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Daemon {
    fn new(config: Config, telemetry: TelemetryHandle, reporter: Arc<dyn HealthReporter>) -> Self {
        Self {
            config,
            telemetry,
            reporter,
        }
    }

    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Runs the command server with the given handler until `signal` fires,
    /// then shuts the listener and watcher down cooperatively.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the listener cannot start (fatal bind
    /// failure), the signal mechanism fails, or a background thread
    /// panicked during teardown.
    pub fn run(
        self,
        handler: Arc<dyn CommandHandler>,
        signal: &dyn ShutdownSignal,
    ) -> Result<(), RunError> {
        let server = CommandServer::new(self.config.listen().clone(), handler);
        let link = server.link();
        let server = server.start()?;
        self.reporter
            .listener_bound(self.config.listen(), server.local_addr());

        let watcher = self.config.watch.clone().map(|path| {
            self.reporter.watcher_started(&path);
            StatWatcher::spawn(path, self.config.watch_interval(), link)
        });

        let outcome = signal.wait();

        server.shutdown();
        if let Some(watcher) = watcher {
            watcher.shutdown();
            watcher.join()?;
        }
        server.join()?;

        outcome.map_err(RunError::from)
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration loading or telemetry
/// installation fails; the failure is also surfaced through `reporter`.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    reporter.bootstrap_succeeded(&config);
    Ok(Daemon::new(config, telemetry, reporter))
}
