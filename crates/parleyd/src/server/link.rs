//! Shared handle over the write half of the client connection.
//!
//! The connection loop and collaborator threads (the stat watcher) reply
//! through the same [`ClientLink`]. Every send happens under one mutex so
//! frames from different threads never interleave on the wire, and each
//! frame is flushed immediately.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use parley_protocol::reply;

use super::SERVER_TARGET;

/// Cloneable handle to the connected client, if any.
///
/// Sends are silent no-ops while no client is attached, which lets
/// collaborators emit unsolicited events without tracking connection state
/// themselves.
#[derive(Clone)]
pub struct ClientLink {
    shared: Arc<LinkShared>,
}

struct LinkShared {
    sink: Mutex<Option<Box<dyn Write + Send>>>,
    connected: AtomicBool,
    initialized: AtomicBool,
}

impl ClientLink {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(LinkShared {
                sink: Mutex::new(None),
                connected: AtomicBool::new(false),
                initialized: AtomicBool::new(false),
            }),
        }
    }

    /// Marks the server as having bound its listener.
    pub(crate) fn mark_initialized(&self) {
        self.shared.initialized.store(true, Ordering::SeqCst);
    }

    /// Attaches the write half of a freshly accepted connection.
    pub(crate) fn attach(&self, sink: Box<dyn Write + Send>) {
        *self.lock_sink() = Some(sink);
        self.shared.connected.store(true, Ordering::SeqCst);
    }

    /// Drops the write half once the client is gone.
    pub(crate) fn detach(&self) {
        self.shared.connected.store(false, Ordering::SeqCst);
        *self.lock_sink() = None;
    }

    /// True once the listener is bound.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.shared.initialized.load(Ordering::SeqCst)
    }

    /// True while a client connection is attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    /// Writes raw bytes to the client.
    ///
    /// No-op on an empty payload or while no client is attached. The write
    /// and flush happen under the send lock so concurrent senders emit
    /// whole frames.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the write or flush fails.
    pub fn send_raw(&self, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let mut guard = self.lock_sink();
        let Some(sink) = guard.as_mut() else {
            return Ok(());
        };
        trace!(
            target: SERVER_TARGET,
            frame = %String::from_utf8_lossy(bytes).trim_end(),
            "sending frame"
        );
        sink.write_all(bytes)?;
        sink.flush()
    }

    /// Reports a bare success to the client.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the send fails.
    pub fn pass(&self) -> io::Result<()> {
        self.send_raw(reply::ok().as_bytes())
    }

    /// Reports a success carrying detail text.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the send fails.
    pub fn pass_with(&self, detail: impl Display) -> io::Result<()> {
        self.send_raw(reply::ok_with(detail).as_bytes())
    }

    /// Reports a failure with the given code.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the send fails.
    pub fn fail(&self, code: &str) -> io::Result<()> {
        self.send_raw(reply::fail(code).as_bytes())
    }

    /// Reports a failure with the given code and detail text.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the send fails.
    pub fn fail_with(&self, code: &str, detail: impl Display) -> io::Result<()> {
        self.send_raw(reply::fail_with(code, detail).as_bytes())
    }

    /// Convenience for reporting a malformed or incomplete command.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the send fails.
    pub fn fail_syntax(&self) -> io::Result<()> {
        self.fail(reply::SYNTAX)
    }

    /// Sends one line of a multi-line informational reply.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the send fails.
    pub fn send_list_line(&self, text: impl Display) -> io::Result<()> {
        self.send_raw(reply::list_line(text).as_bytes())
    }

    /// Sends the unsolicited watched-file event frame.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the send fails.
    pub fn send_stat(&self, present: bool) -> io::Result<()> {
        self.send_raw(reply::stat_event(present).as_bytes())
    }

    /// Formatted raw send for collaborators that frame their own payloads.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the send fails.
    pub fn send_fmt(&self, args: std::fmt::Arguments<'_>) -> io::Result<()> {
        self.send_raw(args.to_string().as_bytes())
    }

    fn lock_sink(&self) -> std::sync::MutexGuard<'_, Option<Box<dyn Write + Send>>> {
        // A poisoned lock only means another sender panicked mid-write; the
        // sink itself is still safe to reuse or replace.
        self.shared.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
