//! Listener and accept loop for the command server.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use parley_config::ListenEndpoint;

use crate::dispatch::CommandHandler;

use super::connection;
use super::{ClientLink, ListenerError, SERVER_TARGET};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Command server bound to a TCP endpoint.
///
/// One client is served at a time: the accepted connection is handled
/// synchronously on the listener thread, and further clients wait in the
/// TCP backlog until the current one disconnects.
pub struct CommandServer {
    endpoint: ListenEndpoint,
    handler: Arc<dyn CommandHandler>,
    link: ClientLink,
}

impl CommandServer {
    /// Builds a server for the given endpoint and command handler.
    #[must_use]
    pub fn new(endpoint: ListenEndpoint, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            endpoint,
            handler,
            link: ClientLink::new(),
        }
    }

    /// Handle collaborators use to reply or emit unsolicited events.
    #[must_use]
    pub fn link(&self) -> ClientLink {
        self.link.clone()
    }

    /// Binds the endpoint and starts the accept loop on a background thread.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the endpoint cannot be resolved or
    /// bound; the daemon treats this as fatal.
    pub fn start(self) -> Result<ServerHandle, ListenerError> {
        let listener = bind_tcp(&self.endpoint)?;
        listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ListenerError::LocalAddr { source })?;

        self.link.mark_initialized();
        info!(
            target: SERVER_TARGET,
            endpoint = %self.endpoint,
            addr = %local_addr,
            "command server listening"
        );

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let link = self.link.clone();
        let handler = Arc::clone(&self.handler);
        let handle =
            thread::spawn(move || run_accept_loop(&listener, &shutdown_flag, &handler, &link));

        Ok(ServerHandle {
            shutdown,
            handle: Some(handle),
            link: self.link,
            local_addr,
        })
    }
}

/// Handle to the background listener thread.
pub struct ServerHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    link: ClientLink,
    local_addr: SocketAddr,
}

impl std::fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandle")
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

impl ServerHandle {
    /// Handle collaborators use to reply or emit unsolicited events.
    #[must_use]
    pub fn link(&self) -> ClientLink {
        self.link.clone()
    }

    /// Address the listener actually bound, useful when port 0 was asked.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Requests cooperative shutdown of the accept and read loops.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the listener thread to stop.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] when the thread panicked.
    pub fn join(mut self) -> Result<(), ListenerError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => Ok(()),
                Err(_) => Err(ListenerError::ThreadPanic),
            }
        } else {
            Ok(())
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &TcpListener,
    shutdown: &AtomicBool,
    handler: &Arc<dyn CommandHandler>,
    link: &ClientLink,
) {
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                last_error = None;
                info!(target: SERVER_TARGET, peer = %peer, "client connected");
                if let Err(error) = connection::serve(stream, shutdown, handler.as_ref(), link) {
                    warn!(
                        target: SERVER_TARGET,
                        peer = %peer,
                        error = %error,
                        "connection ended with transport error"
                    );
                }
                info!(target: SERVER_TARGET, peer = %peer, "client disconnected");
            }
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(target: SERVER_TARGET, error = %error, "socket accept error");
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
}

fn bind_tcp(endpoint: &ListenEndpoint) -> Result<TcpListener, ListenerError> {
    let mut addrs =
        (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|source| ListenerError::Resolve {
                endpoint: endpoint.to_string(),
                source,
            })?;
    let addr = addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| ListenerError::ResolveEmpty {
            endpoint: endpoint.to_string(),
        })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::Bind { addr, source })
}
