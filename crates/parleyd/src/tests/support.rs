//! Shared fixtures for behaviour tests.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parley_config::ListenEndpoint;

use crate::dispatch::{ArithmeticCommands, CommandHandler};
use crate::server::{CommandServer, ServerHandle};

/// A started server plus the means to connect clients to it.
pub(crate) struct ServerFixture {
    pub(crate) handle: ServerHandle,
}

pub(crate) fn start_demo_server() -> ServerFixture {
    start_server(Arc::new(ArithmeticCommands::new()))
}

pub(crate) fn start_server(handler: Arc<dyn CommandHandler>) -> ServerFixture {
    let server = CommandServer::new(ListenEndpoint::new("127.0.0.1", 0), handler);
    let handle = server.start().expect("start server");
    ServerFixture { handle }
}

impl ServerFixture {
    pub(crate) fn connect(&self) -> TestClient {
        let stream = TcpStream::connect(self.handle.local_addr()).expect("connect client");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("set read timeout");
        let reader = BufReader::new(stream.try_clone().expect("clone stream"));
        TestClient { stream, reader }
    }

    /// Connects and waits until the server has actually attached the
    /// client, so unsolicited sends are observable.
    pub(crate) fn connect_attached(&self) -> TestClient {
        let client = self.connect();
        assert!(
            wait_for(|| self.handle.link().is_connected()),
            "server should attach the client"
        );
        client
    }

    pub(crate) fn stop(self) {
        self.handle.shutdown();
        self.handle.join().expect("join listener");
    }
}

/// Line-oriented test client.
pub(crate) struct TestClient {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl TestClient {
    pub(crate) fn send_line(&mut self, line: &str) {
        self.stream.write_all(line.as_bytes()).expect("write line");
        self.stream.write_all(b"\r\n").expect("write terminator");
        self.stream.flush().expect("flush");
    }

    pub(crate) fn read_reply(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("read reply");
        line
    }

    pub(crate) fn round_trip(&mut self, line: &str) -> String {
        self.send_line(line);
        self.read_reply()
    }
}

/// Polls `condition` for up to two seconds.
pub(crate) fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}
