use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ServerConfig;

/// One selectable input of a player.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SourceConfig {
    /// Label shown in the source list.
    pub name: String,

    /// PulseAudio source name.
    pub source_name: String,
}

/// A sink exposed as a media player whose source is one of `sources`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,

    /// PulseAudio sink name.
    pub sink_name: String,

    /// Candidate sources, in priority order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// Server hosting the sink.
    #[serde(default)]
    pub server: ServerConfig,
}

/// A single (sink, source) loopback exposed as an on/off switch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SwitchConfig {
    /// Display name.
    pub name: String,

    /// PulseAudio sink name.
    pub sink_name: String,

    /// PulseAudio source name.
    pub source_name: String,

    /// Server hosting the sink.
    #[serde(default)]
    pub server: ServerConfig,
}
