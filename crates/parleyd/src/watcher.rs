//! Background watcher emitting `.stat` events for a filesystem path.
//!
//! The watcher polls the configured path and, whenever its existence flips,
//! pushes an unsolicited `.stat <0|1>` frame through the shared client
//! link. The link no-ops while nobody is connected, so the watcher never
//! tracks connection state itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::server::ClientLink;

const WATCHER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::watcher");

/// Granularity at which the poll sleep re-checks the shutdown flag.
const SHUTDOWN_POLL_SLICE: Duration = Duration::from_millis(25);

/// Errors reported by the watcher lifecycle.
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("watcher thread panicked")]
    ThreadPanic,
}

/// Handle to the background poll thread.
pub struct StatWatcher {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StatWatcher {
    /// Spawns a poll thread watching `path` at the given interval.
    #[must_use]
    pub fn spawn(path: Utf8PathBuf, interval: Duration, link: ClientLink) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || run_poll_loop(&path, interval, &shutdown_flag, &link));
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Requests cooperative shutdown of the poll loop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the poll thread to stop.
    ///
    /// # Errors
    ///
    /// Returns [`WatcherError::ThreadPanic`] when the thread panicked.
    pub fn join(mut self) -> Result<(), WatcherError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => Ok(()),
                Err(_) => Err(WatcherError::ThreadPanic),
            }
        } else {
            Ok(())
        }
    }
}

impl Drop for StatWatcher {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_poll_loop(path: &Utf8Path, interval: Duration, shutdown: &AtomicBool, link: &ClientLink) {
    let mut present = path.as_std_path().exists();
    info!(target: WATCHER_TARGET, path = %path, present, "stat watcher active");

    while !shutdown.load(Ordering::SeqCst) {
        sleep_with_shutdown(interval, shutdown);
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        let now_present = path.as_std_path().exists();
        if now_present == present {
            continue;
        }
        present = now_present;
        info!(target: WATCHER_TARGET, path = %path, present, "watched path changed state");

        if let Err(error) = link.send_stat(present) {
            warn!(target: WATCHER_TARGET, error = %error, "failed to send stat event");
        }
    }
}

/// Sleeps for `interval` in slices so shutdown stays responsive.
fn sleep_with_shutdown(interval: Duration, shutdown: &AtomicBool) {
    let mut remaining = interval;
    while !remaining.is_zero() && !shutdown.load(Ordering::SeqCst) {
        let slice = remaining.min(SHUTDOWN_POLL_SLICE);
        thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Instant;

    use tempfile::TempDir;

    use crate::server::{ClientLink, attached_link};

    use super::*;

    fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn reports_existence_flips_through_the_link() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("sentinel"))
            .expect("utf8 path");
        let (link, sink) = attached_link();

        let watcher = StatWatcher::spawn(path.clone(), Duration::from_millis(25), link);

        fs::write(path.as_std_path(), b"present").expect("create sentinel");
        assert!(wait_for(|| sink.contents().contains(".stat 1\r\n")));

        fs::remove_file(path.as_std_path()).expect("remove sentinel");
        assert!(wait_for(|| sink.contents().contains(".stat 0\r\n")));

        watcher.shutdown();
        watcher.join().expect("join watcher");
    }

    #[test]
    fn steady_state_emits_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("sentinel"))
            .expect("utf8 path");
        let (link, sink) = attached_link();

        let watcher = StatWatcher::spawn(path, Duration::from_millis(25), link);
        thread::sleep(Duration::from_millis(150));

        assert_eq!(sink.contents(), "");
        watcher.shutdown();
        watcher.join().expect("join watcher");
    }

    #[test]
    fn survives_a_detached_link() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("sentinel"))
            .expect("utf8 path");
        let link = ClientLink::new();

        let watcher = StatWatcher::spawn(path.clone(), Duration::from_millis(25), link);
        fs::write(path.as_std_path(), b"present").expect("create sentinel");
        thread::sleep(Duration::from_millis(150));

        watcher.shutdown();
        watcher.join().expect("join watcher");
    }
}
