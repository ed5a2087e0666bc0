//! Client for PulseAudio's plain-text control protocol
//! (`module-cli-protocol-tcp`).

/// TCP transport and the `ControlChannel` seam
pub mod client;
/// Command rendering
pub mod command;
/// Listing parsers
pub mod listing;

pub use client::{ControlChannel, POLL_WAIT, ProtocolClient};
pub use command::CliCommand;
