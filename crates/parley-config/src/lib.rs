//! Configuration surface shared by the parley binaries.
//!
//! The daemon resolves its configuration from command-line flags with
//! defaults suitable for local use. Types with wire or file representations
//! (`ListenEndpoint`, `LogFormat`) carry serde derives so embedding
//! applications can persist them.

mod defaults;
mod endpoint;
mod logging;

use std::ffi::OsString;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;

pub use defaults::{
    DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, DEFAULT_WATCH_INTERVAL_MS,
    default_listen_endpoint, default_log_filter, default_log_format,
};
pub use endpoint::{EndpointParseError, ListenEndpoint};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, Parser, PartialEq, Eq)]
#[command(name = "parleyd", version, about = "Line-oriented TCP command server")]
pub struct Config {
    /// Endpoint to listen on, as `host:port`.
    #[arg(long, default_value_t = default_listen_endpoint())]
    pub listen: ListenEndpoint,

    /// Tracing filter expression, e.g. `info` or `parleyd=debug`.
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Log output format (`json` or `compact`).
    #[arg(long, default_value_t)]
    pub log_format: LogFormat,

    /// Path whose existence is watched; state flips emit `.stat` events.
    #[arg(long)]
    pub watch: Option<Utf8PathBuf>,

    /// Watcher polling interval in milliseconds.
    #[arg(long, default_value_t = DEFAULT_WATCH_INTERVAL_MS)]
    pub watch_interval_ms: u64,
}

impl Config {
    /// Loads configuration from the process arguments.
    ///
    /// # Errors
    ///
    /// Returns the underlying `clap` error when the arguments are invalid;
    /// the caller decides how to surface it (the daemon exits non-zero).
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Loads configuration from an explicit argument list.
    ///
    /// # Errors
    ///
    /// Returns the underlying `clap` error when the arguments are invalid.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Accessor for the listen endpoint.
    #[must_use]
    pub fn listen(&self) -> &ListenEndpoint {
        &self.listen
    }

    /// Accessor for the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Accessor for the log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Watcher polling interval as a [`Duration`].
    #[must_use]
    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen_endpoint(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
            watch: None,
            watch_interval_ms: DEFAULT_WATCH_INTERVAL_MS,
        }
    }
}
