//! Command dispatch for the daemon.
//!
//! The connection loop hands each tokenized line to a [`CommandHandler`]
//! injected at server construction. Argument problems (wrong arity,
//! unparsable numbers) are contained inside the handler and reported to the
//! client as `FAIL` replies; only transport errors propagate back to the
//! connection loop.

mod arith;

pub use self::arith::ArithmeticCommands;

use std::io;

use parley_protocol::ServerCommand;

use crate::server::ClientLink;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Handles commands received by the server.
///
/// Implementations resolve the command name, pull arguments off the command
/// view, and reply through the link. The connection loop invokes `handle`
/// synchronously, so a blocking handler blocks the whole connection.
pub trait CommandHandler: Send + Sync + 'static {
    /// Handles a single command line.
    ///
    /// # Errors
    ///
    /// Returns the transport error when replying fails; the connection loop
    /// then drops the client and resumes listening.
    fn handle(&self, command: ServerCommand, client: &ClientLink) -> io::Result<()>;
}
