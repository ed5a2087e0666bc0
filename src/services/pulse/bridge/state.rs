use serde::Serialize;

use crate::services::pulse::device::{
    ModuleIndex, ModuleInfo, SinkInfo, SourceInfo, find_loopback,
};

/// Last state the worker observed on its server
///
/// Published atomically as a whole; readers never see a half-updated view.
/// After a failure the lists keep their last-known contents and only
/// `connected` drops.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerSnapshot {
    /// Whether the last synchronization succeeded
    pub connected: bool,
    /// Sinks on the server
    pub sinks: Vec<SinkInfo>,
    /// Sources on the server
    pub sources: Vec<SourceInfo>,
    /// Loaded modules
    pub modules: Vec<ModuleInfo>,
}

impl ServerSnapshot {
    /// Sink with this exact name
    pub fn sink(&self, name: &str) -> Option<&SinkInfo> {
        self.sinks.iter().find(|sink| sink.name == name)
    }

    /// Loopback module routing `source` into `sink`
    pub fn loopback(&self, sink: &str, source: &str) -> Option<ModuleIndex> {
        find_loopback(&self.modules, sink, source)
    }

    /// First candidate with a loopback into `sink`
    pub fn connected_source<'a, S: AsRef<str>>(
        &self,
        sink: &str,
        candidates: &'a [S],
    ) -> Option<&'a str> {
        candidates
            .iter()
            .map(|source| source.as_ref())
            .find(|source| self.loopback(sink, source).is_some())
    }

    pub(crate) fn disconnected(&self) -> Self {
        Self {
            connected: false,
            ..self.clone()
        }
    }
}
