//! Configuration schema, loading and validation.
//!
//! Describes which PulseAudio servers to talk to and which sinks to expose as
//! players or switches. Configurations are TOML, may pull in other files
//! through `imports = ["@file"]`, and fall back to sensible defaults.

mod devices;
mod general;
mod loading;
mod paths;
mod server;
mod validation;

pub use devices::{PlayerConfig, SourceConfig, SwitchConfig};
pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use server::{Backend, ServerConfig};
pub use validation::{MAX_BUFFER_SIZE, MAX_TCP_TIMEOUT_SECS};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Sinks exposed as media players.
    #[serde(default)]
    pub players: Vec<PlayerConfig>,

    /// Single loopbacks exposed as switches.
    #[serde(default)]
    pub switches: Vec<SwitchConfig>,
}

impl Config {
    /// Player by display name.
    pub fn player(&self, name: &str) -> Option<&PlayerConfig> {
        self.players.iter().find(|player| player.name == name)
    }

    /// Distinct servers referenced by players and switches, first use first.
    pub fn servers(&self) -> Vec<&ServerConfig> {
        let mut servers: Vec<&ServerConfig> = Vec::new();
        let all = self
            .players
            .iter()
            .map(|player| &player.server)
            .chain(self.switches.iter().map(|switch| &switch.server));

        for server in all {
            if !servers.iter().any(|s| s.server_id() == server.server_id()) {
                servers.push(server);
            }
        }
        servers
    }
}

#[cfg(test)]
mod tests;
