use std::io::{self, Read};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use ubx_nav::GnssClient;

const READ_TIMEOUT: Duration = Duration::from_millis(500);
const READ_BUF_LEN: usize = 1024;

/// TCP byte source for a receiver, usually a serial-to-WiFi bridge.
#[derive(Debug, Default)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    last_error: Option<String>,
}

impl TcpTransport {
    pub fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        self.disconnect();
        let result = TcpStream::connect((host, port))
            .and_then(|stream| {
                stream.set_read_timeout(Some(READ_TIMEOUT))?;
                stream.set_nodelay(true)?;
                Ok(stream)
            })
            .with_context(|| format!("Failed to connect to {host}:{port}"));
        match result {
            Ok(stream) => {
                info!("Connected to {host}:{port}");
                self.stream = Some(stream);
                self.last_error = None;
                Ok(())
            },
            Err(e) => {
                self.last_error = Some(format!("{e:#}"));
                Err(e)
            },
        }
    }

    pub fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            debug!("Closing connection to {:?}", stream.peer_addr().ok());
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Reads the socket, converting timeouts into "no data received".
    /// A closed or failed connection disconnects the transport.
    pub fn read(&mut self, output: &mut [u8]) -> usize {
        let Some(stream) = self.stream.as_mut() else {
            return 0;
        };
        match stream.read(output) {
            Ok(0) => {
                self.fail("connection closed by peer".to_string());
                0
            },
            Ok(n) => n,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => 0,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => 0,
            Err(e) => {
                self.fail(e.to_string());
                0
            },
        }
    }

    fn fail(&mut self, reason: String) {
        warn!("Receiver connection lost: {reason}");
        self.last_error = Some(reason);
        self.disconnect();
    }
}

/// Connection state shared with the display
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub connected: bool,
    pub last_error: Option<String>,
}

pub type SharedLinkStatus = Arc<Mutex<LinkStatus>>;

/// A receiver reached over TCP, decoded into a [GnssClient].
pub struct Device {
    transport: TcpTransport,
    client: GnssClient,
    host: String,
    port: u16,
    reconnect: Duration,
    link: SharedLinkStatus,
}

impl Device {
    pub fn new(client: GnssClient, host: String, port: u16, reconnect: Duration) -> Self {
        Self {
            transport: TcpTransport::default(),
            client,
            host,
            port,
            reconnect,
            link: SharedLinkStatus::default(),
        }
    }

    pub fn client(&self) -> &GnssClient {
        &self.client
    }

    pub fn link_status(&self) -> SharedLinkStatus {
        Arc::clone(&self.link)
    }

    /// Read and decode until `stop` is set, reconnecting whenever the link drops.
    pub fn run(&mut self, stop: &AtomicBool) {
        let mut buf = [0u8; READ_BUF_LEN];
        while !stop.load(Ordering::Relaxed) {
            if !self.transport.is_connected() {
                if self.transport.connect(&self.host, self.port).is_err() {
                    self.publish_link_state();
                    thread::sleep(self.reconnect);
                    continue;
                }
                // Nothing from a previous connection may leak into this one
                self.client.reset();
                self.publish_link_state();
            }

            let n = self.transport.read(&mut buf);
            if n > 0 {
                self.client.feed(&buf[..n]);
            } else if !self.transport.is_connected() {
                self.publish_link_state();
                thread::sleep(self.reconnect);
            }
        }
        self.transport.disconnect();
        self.publish_link_state();
        let stats = self.client.stats();
        info!(
            "Stopped after {} frames, {} checksum errors, {} oversized",
            stats.frames, stats.checksum_errors, stats.oversized
        );
    }

    fn publish_link_state(&self) {
        let mut link = self.link.lock().unwrap_or_else(PoisonError::into_inner);
        link.connected = self.transport.is_connected();
        link.last_error = self.transport.last_error().map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use ubx_nav::NavPvtBuilder;

    #[test]
    fn transport_reads_and_notices_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let frame = NavPvtBuilder {
            num_satellites: 9,
            ..NavPvtBuilder::default()
        }
        .into_packet_bytes();
        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            sock.write_all(&frame).unwrap();
        });

        let mut transport = TcpTransport::default();
        transport.connect("127.0.0.1", port).unwrap();
        assert!(transport.is_connected());
        server.join().unwrap();

        let mut client = GnssClient::default();
        let mut buf = [0u8; 64];
        while transport.is_connected() {
            let n = transport.read(&mut buf);
            client.feed(&buf[..n]);
        }
        assert_eq!(client.fixes(), 1);
        assert_eq!(transport.last_error(), Some("connection closed by peer"));
    }

    #[test]
    fn connect_failure_is_recorded() {
        // bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut transport = TcpTransport::default();
        assert!(transport.connect("127.0.0.1", port).is_err());
        assert!(!transport.is_connected());
        assert!(transport.last_error().is_some());
    }
}
