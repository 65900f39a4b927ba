//! Connection lifecycle for the command server.
//!
//! The server owns one TCP listener and serves one client at a time: accept,
//! read lines, dispatch each to the injected handler, and fall back to
//! accepting when the client disconnects. The accept and read loops poll a
//! cooperative shutdown flag so the daemon can stop cleanly.

mod connection;
mod errors;
mod link;
mod listener;
#[cfg(test)]
mod test_support;

pub use self::errors::ListenerError;
pub use self::link::ClientLink;
pub use self::listener::{CommandServer, ServerHandle};
#[cfg(test)]
pub(crate) use self::test_support::{SharedSink, attached_link};

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");
