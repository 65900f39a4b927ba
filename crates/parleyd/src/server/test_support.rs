//! Test doubles shared by server and dispatch tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use super::ClientLink;

/// In-memory sink capturing everything sent through a [`ClientLink`].
#[derive(Clone, Default)]
pub(crate) struct SharedSink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedSink {
    /// Returns the captured bytes as text.
    pub(crate) fn contents(&self) -> String {
        let guard = self
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A link with a [`SharedSink`] already attached, for handler tests.
pub(crate) fn attached_link() -> (ClientLink, SharedSink) {
    let link = ClientLink::new();
    let sink = SharedSink::default();
    link.attach(Box::new(sink.clone()));
    (link, sink)
}
