//! Error types for the command server listener.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding or running the listener.
///
/// Bind-time failures are fatal to the daemon: the operator configured an
/// endpoint the process cannot serve.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to resolve listen address {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("no addresses resolved for {endpoint}")]
    ResolveEmpty { endpoint: String },
    #[error("failed to bind listener at {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to enable non-blocking accept: {source}")]
    NonBlocking {
        #[source]
        source: io::Error,
    },
    #[error("failed to query listener address: {source}")]
    LocalAddr {
        #[source]
        source: io::Error,
    },
    #[error("listener thread panicked")]
    ThreadPanic,
}
