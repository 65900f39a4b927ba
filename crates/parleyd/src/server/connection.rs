//! Read loop for one accepted client connection.

use std::io::{self, BufRead, BufReader};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use parley_protocol::{ServerCommand, normalize_line, tokenize};

use crate::dispatch::CommandHandler;

use super::{ClientLink, SERVER_TARGET};

/// Read timeout armed on the stream so the loop can poll the shutdown flag.
const READ_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Serves one client until it disconnects or shutdown is requested.
///
/// The write half is attached to the link for the duration of the
/// connection; replies are transmitted promptly because Nagle coalescing is
/// disabled up front.
pub(super) fn serve(
    stream: TcpStream,
    shutdown: &AtomicBool,
    handler: &dyn CommandHandler,
    link: &ClientLink,
) -> io::Result<()> {
    // The listener socket is non-blocking; the accepted stream must not be.
    stream.set_nonblocking(false)?;
    stream.set_nodelay(true)?;
    stream.set_read_timeout(Some(READ_POLL_INTERVAL))?;
    link.attach(Box::new(stream.try_clone()?));

    let result = read_loop(stream, shutdown, handler, link);
    link.detach();
    result
}

fn read_loop(
    stream: TcpStream,
    shutdown: &AtomicBool,
    handler: &dyn CommandHandler,
    link: &ClientLink,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        match reader.read_line(&mut line) {
            // EOF: the client closed the connection.
            Ok(0) => return Ok(()),
            Ok(_) => {
                dispatch_line(&line, handler, link)?;
                line.clear();
            }
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                // Partial input stays buffered in `line` across the poll.
                if shutdown.load(Ordering::SeqCst) {
                    return Ok(());
                }
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
}

fn dispatch_line(raw: &str, handler: &dyn CommandHandler, link: &ClientLink) -> io::Result<()> {
    // Tabs become spaces; lines with no content are discarded, not
    // dispatched.
    let Some(line) = normalize_line(raw) else {
        return Ok(());
    };
    debug!(target: SERVER_TARGET, line = %line, "received command line");

    let tokens = match tokenize(&line) {
        Ok(tokens) => tokens,
        Err(error) => {
            // Contained in the connection: the client is told, the loop
            // keeps reading.
            warn!(target: SERVER_TARGET, error = %error, "rejected command line");
            return link.fail_syntax();
        }
    };
    if tokens.is_empty() {
        return Ok(());
    }

    handler.handle(ServerCommand::new(tokens), link)
}
