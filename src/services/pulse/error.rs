use std::io;

use super::VolumeError;

/// PulseAudio service errors
#[derive(thiserror::Error, Debug)]
pub enum PulseError {
    /// Transport could not be opened, or a send/receive failed mid-command
    #[error("PulseAudio connection failed: {0}")]
    ConnectionFailed(String),

    /// Connect or read exceeded the configured TCP timeout
    #[error("PulseAudio connection to {server} timed out")]
    Timeout {
        /// Server the command was addressed to
        server: String,
    },

    /// Server rejected a command or answered with something unparseable
    #[error("PulseAudio protocol error: {0}")]
    Protocol(String),

    /// Operation was issued while the server connection is down
    #[error("Not connected to PulseAudio server {0}")]
    NotConnected(String),

    /// Volume conversion failed
    #[error("Volume conversion failed")]
    VolumeConversion(#[from] VolumeError),

    /// Sink not present in the last snapshot
    #[error("Sink '{0}' not found")]
    SinkNotFound(String),

    /// Source display name is not one of the configured sources
    #[error("Source '{0}' is not configured for this device")]
    UnknownSource(String),

    /// Worker thread has stopped or dropped the completion notifier
    #[error("PulseAudio worker communication failed")]
    ThreadCommunication,

    /// Service initialization failed
    #[error("Service initialization failed: {0}")]
    InitializationFailed(String),
}

impl PulseError {
    /// Whether this error means the server link is unusable.
    ///
    /// The worker tears the connection down on these and reconnects on the
    /// next tick.
    pub fn is_connection_loss(&self) -> bool {
        matches!(
            self,
            PulseError::ConnectionFailed(_)
                | PulseError::Timeout { .. }
                | PulseError::Protocol(_)
                | PulseError::NotConnected(_)
        )
    }

    pub(crate) fn from_io(error: io::Error, server: &str) -> Self {
        match error.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => PulseError::Timeout {
                server: server.to_string(),
            },
            _ => PulseError::ConnectionFailed(format!("{server}: {error}")),
        }
    }
}
