use std::{
    borrow::Cow,
    cell::{Cell, RefCell},
    rc::Rc,
};

use libpulse_binding::{
    callbacks::ListResult,
    context::{
        Context, FlagSet as ContextFlags, State as ContextState,
        introspect::{
            ModuleInfo as PulseModuleInfo, SinkInfo as PulseSinkInfo,
            SourceInfo as PulseSourceInfo,
        },
    },
    def::INVALID_INDEX,
    mainloop::standard::{IterateResult, Mainloop},
    operation::{Operation, State as OperationState},
    volume::{ChannelVolumes, Volume as PulseVolume},
};
use tracing::{debug, info};

use super::PulseConnection;
use crate::services::pulse::{
    PulseError, Volume,
    device::{DeviceIndex, LOOPBACK_MODULE, ModuleIndex, ModuleInfo, SinkInfo, SourceInfo},
};

const APPLICATION_NAME: &str = "pulselink";

/// `PulseConnection` over libpulse's native protocol
///
/// Drives a standard (blocking) mainloop by hand. The mainloop and context
/// are not `Send`, so the connection must be created on the thread that uses
/// it.
pub struct NativeConnection {
    server: Option<String>,
    mainloop: Option<Mainloop>,
    context: Option<Context>,
}

impl NativeConnection {
    /// Connection to `server`, or to the default server when `None`
    pub fn new(server: Option<String>) -> Self {
        Self {
            server,
            mainloop: None,
            context: None,
        }
    }

    fn iterate(&mut self, block: bool) -> Result<(), PulseError> {
        let Some(mainloop) = self.mainloop.as_mut() else {
            return Err(PulseError::NotConnected(self.server_id()));
        };
        iterate(mainloop, block)
    }

    fn context(&self) -> Result<&Context, PulseError> {
        self.context
            .as_ref()
            .ok_or_else(|| PulseError::NotConnected(self.server_id()))
    }

    fn wait<F: ?Sized>(&mut self, operation: Operation<F>) -> Result<(), PulseError> {
        loop {
            match operation.get_state() {
                OperationState::Done => return Ok(()),
                OperationState::Cancelled => {
                    return Err(PulseError::Protocol("operation cancelled".to_string()));
                }
                OperationState::Running => self.iterate(true)?,
            }
        }
    }

    fn wait_for_success<F: ?Sized>(
        &mut self,
        operation: Operation<F>,
        success: &Cell<bool>,
        what: &str,
    ) -> Result<(), PulseError> {
        self.wait(operation)?;
        if success.get() {
            Ok(())
        } else {
            Err(PulseError::Protocol(format!("{what} rejected by server")))
        }
    }

    fn finish_listing<F: ?Sized>(
        &mut self,
        operation: Operation<F>,
        failed: &Cell<bool>,
        what: &str,
    ) -> Result<(), PulseError> {
        self.wait(operation)?;
        if failed.get() {
            return Err(PulseError::Protocol(format!("{what} listing failed")));
        }
        Ok(())
    }
}

fn iterate(mainloop: &mut Mainloop, block: bool) -> Result<(), PulseError> {
    match mainloop.iterate(block) {
        IterateResult::Success(_) => Ok(()),
        IterateResult::Quit(_) => Err(PulseError::ConnectionFailed("mainloop quit".to_string())),
        IterateResult::Err(e) => Err(PulseError::ConnectionFailed(format!(
            "mainloop iteration failed: {e}"
        ))),
    }
}

impl PulseConnection for NativeConnection {
    fn server_id(&self) -> String {
        self.server.clone().unwrap_or_else(|| "default".to_string())
    }

    fn connect(&mut self) -> Result<(), PulseError> {
        self.disconnect();

        let mut mainloop = Mainloop::new().ok_or_else(|| {
            PulseError::InitializationFailed("cannot create mainloop".to_string())
        })?;
        let mut context = Context::new(&mainloop, APPLICATION_NAME).ok_or_else(|| {
            PulseError::InitializationFailed("cannot create context".to_string())
        })?;

        context
            .connect(self.server.as_deref(), ContextFlags::NOFLAGS, None)
            .map_err(|e| PulseError::ConnectionFailed(format!("{}: {e}", self.server_id())))?;

        loop {
            iterate(&mut mainloop, true)?;
            match context.get_state() {
                ContextState::Ready => break,
                ContextState::Failed | ContextState::Terminated => {
                    return Err(PulseError::ConnectionFailed(format!(
                        "{}: context did not become ready",
                        self.server_id()
                    )));
                }
                _ => {}
            }
        }

        info!(server = %self.server_id(), "Connected to PulseAudio");
        self.mainloop = Some(mainloop);
        self.context = Some(context);
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        if self.iterate(false).is_err() {
            return false;
        }
        self.context
            .as_ref()
            .is_some_and(|context| matches!(context.get_state(), ContextState::Ready))
    }

    fn disconnect(&mut self) {
        if let Some(mut context) = self.context.take() {
            debug!(server = %self.server_id(), "Disconnecting from PulseAudio");
            context.disconnect();
        }
        self.mainloop = None;
    }

    fn sinks(&mut self) -> Result<Vec<SinkInfo>, PulseError> {
        let items = Rc::new(RefCell::new(Vec::new()));
        let failed = Rc::new(Cell::new(false));
        let operation = {
            let items = Rc::clone(&items);
            let failed = Rc::clone(&failed);
            self.context()?
                .introspect()
                .get_sink_info_list(move |result| match result {
                    ListResult::Item(info) => items.borrow_mut().push(sink_from_pulse(info)),
                    ListResult::End => {}
                    ListResult::Error => failed.set(true),
                })
        };
        self.finish_listing(operation, &failed, "sink")?;
        Ok(items.take())
    }

    fn sources(&mut self) -> Result<Vec<SourceInfo>, PulseError> {
        let items = Rc::new(RefCell::new(Vec::new()));
        let failed = Rc::new(Cell::new(false));
        let operation = {
            let items = Rc::clone(&items);
            let failed = Rc::clone(&failed);
            self.context()?.introspect().get_source_info_list(
                move |result| match result {
                    ListResult::Item(info) => items.borrow_mut().push(source_from_pulse(info)),
                    ListResult::End => {}
                    ListResult::Error => failed.set(true),
                },
            )
        };
        self.finish_listing(operation, &failed, "source")?;
        Ok(items.take())
    }

    fn modules(&mut self, _force: bool) -> Result<Vec<ModuleInfo>, PulseError> {
        let items = Rc::new(RefCell::new(Vec::new()));
        let failed = Rc::new(Cell::new(false));
        let operation = {
            let items = Rc::clone(&items);
            let failed = Rc::clone(&failed);
            self.context()?.introspect().get_module_info_list(
                move |result| match result {
                    ListResult::Item(info) => items.borrow_mut().push(module_from_pulse(info)),
                    ListResult::End => {}
                    ListResult::Error => failed.set(true),
                },
            )
        };
        self.finish_listing(operation, &failed, "module")?;
        Ok(items.take())
    }

    fn load_loopback(&mut self, sink: &str, source: &str) -> Result<(), PulseError> {
        let loaded = Rc::new(Cell::new(INVALID_INDEX));
        let argument = format!("sink={sink} source={source}");
        let operation = {
            let loaded = Rc::clone(&loaded);
            self.context()?
                .introspect()
                .load_module(LOOPBACK_MODULE, &argument, move |index| loaded.set(index))
        };
        self.wait(operation)?;

        if loaded.get() == INVALID_INDEX {
            return Err(PulseError::Protocol(format!(
                "loading {LOOPBACK_MODULE} with '{argument}' failed"
            )));
        }
        debug!(module = loaded.get(), %argument, "Loopback loaded");
        Ok(())
    }

    fn unload_module(&mut self, module: ModuleIndex) -> Result<(), PulseError> {
        let success = Rc::new(Cell::new(false));
        let operation = {
            let success = Rc::clone(&success);
            self.context()?
                .introspect()
                .unload_module(module.0, move |ok| success.set(ok))
        };
        self.wait_for_success(operation, &success, "unload-module")
    }

    fn set_sink_volume(&mut self, sink: DeviceIndex, volume: &Volume) -> Result<(), PulseError> {
        let success = Rc::new(Cell::new(false));
        let pulse_volume = volume_to_pulse(volume);
        let operation = {
            let success = Rc::clone(&success);
            self.context()?.introspect().set_sink_volume_by_index(
                sink.0,
                &pulse_volume,
                Some(Box::new(move |ok| success.set(ok))),
            )
        };
        self.wait_for_success(operation, &success, "set-sink-volume")
    }

    fn set_sink_mute(&mut self, sink: DeviceIndex, muted: bool) -> Result<(), PulseError> {
        let success = Rc::new(Cell::new(false));
        let operation = {
            let success = Rc::clone(&success);
            self.context()?.introspect().set_sink_mute_by_index(
                sink.0,
                muted,
                Some(Box::new(move |ok| success.set(ok))),
            )
        };
        self.wait_for_success(operation, &success, "set-sink-mute")
    }
}

impl Drop for NativeConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn owned(value: Option<&Cow<'_, str>>) -> String {
    value.map(|s| s.to_string()).unwrap_or_default()
}

/// Maps PulseAudio's raw channel volumes to levels where 1.0 is 100%
fn volume_from_pulse(volume: &ChannelVolumes) -> Volume {
    let raw: Vec<u32> = volume.get().iter().map(|v| v.0).collect();
    Volume::from_raw(&raw)
}

/// Flattens to the average level across all channels
fn volume_to_pulse(volume: &Volume) -> ChannelVolumes {
    let mut pulse_volume = ChannelVolumes::default();
    pulse_volume.set(volume.channels() as u8, PulseVolume(volume.average_raw()));
    pulse_volume
}

fn sink_from_pulse(info: &PulseSinkInfo) -> SinkInfo {
    SinkInfo {
        index: DeviceIndex(info.index),
        name: owned(info.name.as_ref()),
        description: owned(info.description.as_ref()),
        volume: volume_from_pulse(&info.volume),
        muted: info.mute,
    }
}

fn source_from_pulse(info: &PulseSourceInfo) -> SourceInfo {
    SourceInfo {
        index: DeviceIndex(info.index),
        name: owned(info.name.as_ref()),
        description: owned(info.description.as_ref()),
    }
}

fn module_from_pulse(info: &PulseModuleInfo) -> ModuleInfo {
    ModuleInfo {
        index: ModuleIndex(info.index),
        name: owned(info.name.as_ref()),
        argument: owned(info.argument.as_ref()),
    }
}
