use std::fmt;

use serde::Serialize;

use crate::services::pulse::Volume;

/// Module type tag of a loopback module
pub const LOOPBACK_MODULE: &str = "module-loopback";

/// Sink or source index identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceIndex(pub u32);

impl fmt::Display for DeviceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned module index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleIndex(pub u32);

impl fmt::Display for ModuleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one sink as last reported by the server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinkInfo {
    /// Sink index
    pub index: DeviceIndex,
    /// Sink name, unique within a server
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Per-channel volume
    #[serde(serialize_with = "serialize_volume")]
    pub volume: Volume,
    /// Whether the sink is muted
    pub muted: bool,
}

impl SinkInfo {
    /// Number of channels the sink volume is expressed in
    pub fn channels(&self) -> usize {
        self.volume.channels()
    }
}

/// Snapshot of one source as last reported by the server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    /// Source index
    pub index: DeviceIndex,
    /// Source name used for loopback routing
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// One loaded module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Module index
    pub index: ModuleIndex,
    /// Module type tag, e.g. `module-loopback`
    pub name: String,
    /// Raw argument string, e.g. `sink=out source=in`
    pub argument: String,
}

impl ModuleInfo {
    /// Whether this is a loopback routing `source` into `sink`
    ///
    /// Matches when both `sink=<sink>` and `source=<source>` occur in the
    /// argument string, in any order.
    pub fn routes(&self, sink: &str, source: &str) -> bool {
        self.name == LOOPBACK_MODULE
            && self.argument.contains(&format!("sink={sink}"))
            && self.argument.contains(&format!("source={source}"))
    }
}

/// Index of the first loopback module routing `source` into `sink`
pub fn find_loopback(modules: &[ModuleInfo], sink: &str, source: &str) -> Option<ModuleIndex> {
    modules
        .iter()
        .find(|module| module.routes(sink, source))
        .map(|module| module.index)
}

fn serialize_volume<S: serde::Serializer>(volume: &Volume, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(volume.as_slice())
}
