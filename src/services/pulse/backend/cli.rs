use tracing::debug;

use super::PulseConnection;
use crate::services::pulse::{
    PulseError, Volume,
    device::{DeviceIndex, ModuleIndex, ModuleInfo, SinkInfo, SourceInfo},
    loopback::LoopbackController,
    protocol::{CliCommand, ControlChannel, ProtocolClient, listing},
};

/// `PulseConnection` over the text control protocol
///
/// There is no session to hold open: "connected" means the last exchange
/// with the server succeeded.
#[derive(Debug)]
pub struct CliConnection<C = ProtocolClient> {
    controller: LoopbackController<C>,
    connected: bool,
}

impl<C: ControlChannel> CliConnection<C> {
    /// Wrap a control channel
    pub fn new(channel: C) -> Self {
        Self::with_controller(LoopbackController::new(channel))
    }

    /// Wrap an existing controller, keeping its cache settings
    pub fn with_controller(controller: LoopbackController<C>) -> Self {
        Self {
            controller,
            connected: false,
        }
    }

    fn track<T>(&mut self, result: Result<T, PulseError>) -> Result<T, PulseError> {
        if result.is_err() {
            self.connected = false;
        }
        result
    }

    fn listing(&mut self, command: &CliCommand) -> Result<String, PulseError> {
        let result = self.controller.channel().send_command(command);
        self.track(result)
    }
}

impl<C: ControlChannel> PulseConnection for CliConnection<C> {
    fn server_id(&self) -> String {
        self.controller.channel().server_id()
    }

    fn connect(&mut self) -> Result<(), PulseError> {
        debug!(server = %self.server_id(), "Probing control endpoint");
        self.controller.invalidate();
        self.controller.refresh(true)?;
        self.connected = true;
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.controller.invalidate();
    }

    fn sinks(&mut self) -> Result<Vec<SinkInfo>, PulseError> {
        let text = self.listing(&CliCommand::ListSinks)?;
        listing::parse_sinks(&text)
    }

    fn sources(&mut self) -> Result<Vec<SourceInfo>, PulseError> {
        let text = self.listing(&CliCommand::ListSources)?;
        listing::parse_sources(&text)
    }

    fn modules(&mut self, force: bool) -> Result<Vec<ModuleInfo>, PulseError> {
        let result = self.controller.refresh(force);
        self.track(result)?;
        self.controller.cache().modules()
    }

    fn load_loopback(&mut self, sink: &str, source: &str) -> Result<(), PulseError> {
        let result = self.controller.connect(sink, source);
        self.track(result)
    }

    fn unload_module(&mut self, module: ModuleIndex) -> Result<(), PulseError> {
        let result = self.controller.disconnect(module);
        self.track(result)
    }

    fn set_sink_volume(&mut self, sink: DeviceIndex, volume: &Volume) -> Result<(), PulseError> {
        let result = self.controller.send_mutation(&CliCommand::SetSinkVolume {
            sink,
            raw: volume.average_raw(),
        });
        self.track(result)
    }

    fn set_sink_mute(&mut self, sink: DeviceIndex, muted: bool) -> Result<(), PulseError> {
        let result = self
            .controller
            .send_mutation(&CliCommand::SetSinkMute { sink, muted });
        self.track(result)
    }
}
