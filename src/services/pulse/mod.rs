//! PulseAudio loopback routing and sink control.
//!
//! Two ways to reach a server share one data model:
//!
//! - [`protocol`] and [`loopback`] speak the text protocol of
//!   `module-cli-protocol-tcp` directly and synchronously.
//! - [`bridge`] owns a [`backend::PulseConnection`] on a dedicated worker
//!   thread and exposes it through async calls and published snapshots.
//!
//! [`device`] builds media players and switches on top of a bridge, and
//! [`registry`] makes devices on the same server share one bridge.

/// Connections owned by a bridge worker
pub mod backend;
/// Worker thread and async front
pub mod bridge;
/// Device types and control traits
pub mod device;
/// Error types
pub mod error;
/// Loopback routing over the text protocol
pub mod loopback;
/// Text protocol client and parsers
pub mod protocol;
/// Bridge sharing between devices
pub mod registry;
/// Volume domain
pub mod volume;

#[cfg(test)]
mod fake;

pub use bridge::{PulseBridge, ServerSnapshot};
pub use device::{
    DeviceIndex, LoopbackSwitch, ModuleIndex, ModuleInfo, PowerControl, SinkInfo, SinkPlayer,
    SourceInfo, SourceSelector, VolumeController,
};
pub use error::PulseError;
pub use loopback::{LoopbackAction, LoopbackController, ModuleStateCache};
pub use protocol::ProtocolClient;
pub use registry::ServerRegistry;
pub use volume::{Volume, VolumeError};
