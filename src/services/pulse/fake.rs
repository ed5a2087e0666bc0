//! In-memory PulseAudio CLI server for unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    PulseError,
    device::{LOOPBACK_MODULE, ModuleIndex},
    protocol::{CliCommand, ControlChannel},
};

#[derive(Debug, Default)]
struct State {
    modules: Vec<(u32, String, String)>,
    sinks: Vec<(u32, String, u32, bool)>,
    sources: Vec<(u32, String)>,
    next_module: u32,
    log: Vec<String>,
    offline: bool,
}

/// Shared handle; clones see the same server
#[derive(Debug, Clone, Default)]
pub struct MemoryServer {
    state: Arc<Mutex<State>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        let server = Self::default();
        server.lock().next_module = 20;
        server
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_sink(self, index: u32, name: &str) -> Self {
        self.lock().sinks.push((index, name.to_string(), 65536, false));
        self
    }

    pub fn with_source(self, index: u32, name: &str) -> Self {
        self.lock().sources.push((index, name.to_string()));
        self
    }

    pub fn with_module(self, name: &str, argument: &str) -> Self {
        {
            let mut state = self.lock();
            let index = state.next_module;
            state.next_module += 1;
            state.modules.push((index, name.to_string(), argument.to_string()));
        }
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn log(&self) -> Vec<String> {
        self.lock().log.clone()
    }

    pub fn count(&self, line: &str) -> usize {
        self.lock().log.iter().filter(|l| l.as_str() == line).count()
    }

    pub fn loopbacks(&self) -> Vec<String> {
        let mut loopbacks: Vec<String> = self
            .lock()
            .modules
            .iter()
            .filter(|(_, name, _)| name == LOOPBACK_MODULE)
            .map(|(_, _, argument)| argument.clone())
            .collect();
        loopbacks.sort();
        loopbacks
    }

    pub fn sink_state(&self, name: &str) -> Option<(u32, bool)> {
        self.lock()
            .sinks
            .iter()
            .find(|(_, n, _, _)| n == name)
            .map(|(_, _, raw, muted)| (*raw, *muted))
    }

    fn render_modules(state: &State) -> String {
        let mut text = format!("{} module(s) loaded.\n", state.modules.len());
        for (index, name, argument) in &state.modules {
            text.push_str(&format!(
                "    index: {index}\n\tname: <{name}>\n\targument: <{argument}>\n\tused: -1\n"
            ));
        }
        text
    }

    fn render_sinks(state: &State) -> String {
        let mut text = format!("{} sink(s) available.\n", state.sinks.len());
        for (index, name, raw, muted) in &state.sinks {
            let muted = if *muted { "yes" } else { "no" };
            text.push_str(&format!(
                "    index: {index}\n\tname: <{name}>\n\tvolume: front-left: {raw} / 100% / 0.00 dB,   front-right: {raw} / 100% / 0.00 dB\n\tmuted: {muted}\n"
            ));
        }
        text
    }

    fn render_sources(state: &State) -> String {
        let mut text = format!("{} source(s) available.\n", state.sources.len());
        for (index, name) in &state.sources {
            text.push_str(&format!("    index: {index}\n\tname: <{name}>\n"));
        }
        text
    }
}

impl ControlChannel for MemoryServer {
    fn send_command(&self, command: &CliCommand) -> Result<String, PulseError> {
        let mut state = self.lock();
        if state.offline {
            return Err(PulseError::ConnectionFailed("memory server offline".to_string()));
        }
        state.log.push(command.to_string());

        let reply = match command {
            CliCommand::ListModules => Self::render_modules(&state),
            CliCommand::ListSinks => Self::render_sinks(&state),
            CliCommand::ListSources => Self::render_sources(&state),
            CliCommand::LoadLoopback { sink, source } => {
                let index = state.next_module;
                state.next_module += 1;
                state.modules.push((
                    index,
                    LOOPBACK_MODULE.to_string(),
                    format!("sink={sink} source={source}"),
                ));
                String::new()
            }
            CliCommand::UnloadModule(ModuleIndex(index)) => {
                state.modules.retain(|(i, _, _)| i != index);
                String::new()
            }
            CliCommand::SetSinkVolume { sink, raw } => {
                if let Some(entry) = state.sinks.iter_mut().find(|(i, _, _, _)| *i == sink.0) {
                    entry.2 = *raw;
                }
                String::new()
            }
            CliCommand::SetSinkMute { sink, muted } => {
                if let Some(entry) = state.sinks.iter_mut().find(|(i, _, _, _)| *i == sink.0) {
                    entry.3 = *muted;
                }
                String::new()
            }
        };
        Ok(reply)
    }

    fn server_id(&self) -> String {
        "memory:4712".to_string()
    }
}
