use std::{
    io::{ErrorKind, Read, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::{Duration, Instant},
};

use tracing::{debug, info, instrument};

use super::CliCommand;
use crate::{config::MAX_BUFFER_SIZE, services::pulse::PulseError};

/// How long one read waits for bytes before the response counts as complete
pub const POLL_WAIT: Duration = Duration::from_millis(200);

/// Anything that can carry a CLI command to a server and hand back its reply
///
/// `ProtocolClient` is the TCP implementation; tests substitute in-memory
/// servers.
pub trait ControlChannel {
    /// Send one command
    ///
    /// Returns the drained reply for listing commands and an empty string
    /// for commands without a reply.
    ///
    /// # Errors
    /// Returns `ConnectionFailed`/`Timeout` on transport failure and
    /// `Protocol` when the reply cannot be decoded
    fn send_command(&self, command: &CliCommand) -> Result<String, PulseError>;

    /// Identity of the server this channel talks to
    fn server_id(&self) -> String;
}

/// Client for PulseAudio's plain-text TCP control protocol
///
/// Every command opens a fresh connection and closes it afterwards.
#[derive(Debug, Clone)]
pub struct ProtocolClient {
    host: String,
    port: u16,
    buffer_size: usize,
    tcp_timeout: Duration,
}

impl ProtocolClient {
    /// Create a client for `host:port`
    ///
    /// `buffer_size` is the receive chunk size, `tcp_timeout` bounds both
    /// connecting and draining one response.
    pub fn new(host: impl Into<String>, port: u16, buffer_size: usize, tcp_timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            buffer_size: buffer_size.clamp(1, MAX_BUFFER_SIZE),
            tcp_timeout,
        }
    }

    /// Open a transport connection to the control endpoint
    ///
    /// # Errors
    /// Returns `ConnectionFailed` when the address does not resolve or every
    /// resolved address refuses, and `Timeout` when connecting takes longer
    /// than `tcp_timeout`
    pub fn connect(&self) -> Result<TcpStream, PulseError> {
        let server = self.server_id();
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| PulseError::ConnectionFailed(format!("{server}: {e}")))?
            .collect();

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.tcp_timeout) {
                Ok(stream) => {
                    stream
                        .set_write_timeout(Some(self.tcp_timeout))
                        .map_err(|e| PulseError::from_io(e, &server))?;
                    return Ok(stream);
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(e) => PulseError::from_io(e, &server),
            None => PulseError::ConnectionFailed(format!("{server}: no address resolved")),
        })
    }

    /// Write `command` followed by a newline and optionally drain the reply
    ///
    /// # Errors
    /// Propagates transport failures; the reply must be valid UTF-8
    #[instrument(skip(self), fields(server = %self.server_id()))]
    pub fn send_raw(&self, command: &str, expect_response: bool) -> Result<String, PulseError> {
        let server = self.server_id();
        let mut stream = self.connect()?;

        info!("Calling pulseaudio: {command}");
        stream
            .write_all(format!("{command}\n").as_bytes())
            .map_err(|e| PulseError::from_io(e, &server))?;

        if !expect_response {
            return Ok(String::new());
        }

        let response = self.drain_response(&mut stream)?;
        debug!(bytes = response.len(), "Data received from pulseaudio");
        Ok(response)
    }

    /// Read until the peer goes quiet for one poll window, closes, or the
    /// overall deadline passes
    fn drain_response(&self, stream: &mut TcpStream) -> Result<String, PulseError> {
        let server = self.server_id();
        let deadline = Instant::now().checked_add(self.tcp_timeout);
        let mut chunk = vec![0u8; self.buffer_size];
        let mut received = Vec::new();

        loop {
            // No representable deadline: stop on quiet or close only.
            let remaining = deadline.map_or(POLL_WAIT, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
            if remaining.is_zero() {
                break;
            }

            stream
                .set_read_timeout(Some(remaining.min(POLL_WAIT)))
                .map_err(|e| PulseError::from_io(e, &server))?;

            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => received.extend_from_slice(&chunk[..n]),
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(PulseError::from_io(e, &server)),
            }
        }

        String::from_utf8(received)
            .map_err(|e| PulseError::Protocol(format!("{server} sent non UTF-8 data: {e}")))
    }
}

impl ControlChannel for ProtocolClient {
    fn send_command(&self, command: &CliCommand) -> Result<String, PulseError> {
        self.send_raw(&command.to_string(), command.expects_response())
    }

    fn server_id(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
