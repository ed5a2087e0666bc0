//! Server connections owned by the bridge worker.
//!
//! A `PulseConnection` is only ever touched from the worker thread that
//! created it, so implementations may hold non-`Send` client handles.

/// Text-protocol connection
pub mod cli;
/// libpulse connection
#[cfg(feature = "native")]
pub mod native;

pub use cli::CliConnection;
#[cfg(feature = "native")]
pub use native::NativeConnection;

use super::{
    PulseError, Volume,
    device::{DeviceIndex, ModuleIndex, ModuleInfo, SinkInfo, SourceInfo},
};

/// Blocking operations against one PulseAudio server
pub trait PulseConnection {
    /// Identity of the server, `host:port` or the libpulse server string
    fn server_id(&self) -> String;

    /// Establish the connection
    ///
    /// # Errors
    /// Returns `ConnectionFailed` or `Timeout` when the server is unreachable
    fn connect(&mut self) -> Result<(), PulseError>;

    /// Whether the connection is currently usable
    fn is_connected(&mut self) -> bool;

    /// Tear the connection down; safe to call when already down
    fn disconnect(&mut self);

    /// Current sinks
    ///
    /// # Errors
    /// Transport or protocol failure
    fn sinks(&mut self) -> Result<Vec<SinkInfo>, PulseError>;

    /// Current sources
    ///
    /// # Errors
    /// Transport or protocol failure
    fn sources(&mut self) -> Result<Vec<SourceInfo>, PulseError>;

    /// Loaded modules
    ///
    /// Unforced calls may answer from a throttled cache.
    ///
    /// # Errors
    /// Transport or protocol failure
    fn modules(&mut self, force: bool) -> Result<Vec<ModuleInfo>, PulseError>;

    /// Load a loopback routing `source` into `sink`
    ///
    /// # Errors
    /// Transport or protocol failure
    fn load_loopback(&mut self, sink: &str, source: &str) -> Result<(), PulseError>;

    /// Unload a module
    ///
    /// # Errors
    /// Transport or protocol failure
    fn unload_module(&mut self, module: ModuleIndex) -> Result<(), PulseError>;

    /// Set a sink's volume, flattened to one level across `volume.channels()`
    ///
    /// # Errors
    /// Transport or protocol failure
    fn set_sink_volume(&mut self, sink: DeviceIndex, volume: &Volume) -> Result<(), PulseError>;

    /// Mute or unmute a sink
    ///
    /// # Errors
    /// Transport or protocol failure
    fn set_sink_mute(&mut self, sink: DeviceIndex, muted: bool) -> Result<(), PulseError>;
}
