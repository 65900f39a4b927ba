//! The parley daemon: a reusable line-oriented TCP command server.
//!
//! The daemon accepts one client connection at a time, splits each received
//! line into tokens, dispatches the first token as a command name to an
//! injected [`CommandHandler`], and replies with CRLF-terminated `OK`/`FAIL`
//! frames. A background [`StatWatcher`] shares the reply path to push
//! unsolicited `.stat` events when a watched file appears or disappears.
//!
//! Embedding applications supply their own command set by implementing
//! [`CommandHandler`] and passing it to [`run`] (or wiring
//! [`server::CommandServer`] directly); the [`ArithmeticCommands`] set
//! shipped with the daemon binary is a demonstration.

mod bootstrap;
pub mod dispatch;
mod health;
pub mod server;
mod shutdown;
mod telemetry;
mod watcher;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, RunError, StaticConfigLoader, SystemConfigLoader,
    bootstrap_with,
};
pub use dispatch::{ArithmeticCommands, CommandHandler};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use server::{ClientLink, CommandServer, ListenerError, ServerHandle};
pub use shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use watcher::{StatWatcher, WatcherError};

use std::sync::Arc;

use parley_config::Config;

/// Bootstraps and runs the daemon with the given handler until a shutdown
/// signal arrives.
///
/// # Errors
///
/// Returns [`RunError`] when bootstrap fails, the listener cannot bind
/// (fatal per the error taxonomy), or teardown detects a panicked thread.
pub fn run(config: Config, handler: Arc<dyn CommandHandler>) -> Result<(), RunError> {
    let reporter: Arc<dyn HealthReporter> = Arc::new(StructuredHealthReporter::new());
    let loader = StaticConfigLoader::new(config);
    let daemon = bootstrap_with(&loader, reporter)?;
    daemon.run(handler, &SystemShutdownSignal)
}

#[cfg(test)]
mod tests;
