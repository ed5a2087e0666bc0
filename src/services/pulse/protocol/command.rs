use std::fmt;

use crate::services::pulse::device::{DeviceIndex, LOOPBACK_MODULE, ModuleIndex};

/// Commands understood by `module-cli-protocol-tcp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// List loaded modules
    ListModules,
    /// List sinks with volume and mute state
    ListSinks,
    /// List sources
    ListSources,
    /// Load a loopback routing `source` into `sink`
    LoadLoopback {
        /// Sink name
        sink: String,
        /// Source name
        source: String,
    },
    /// Unload a module by index
    UnloadModule(ModuleIndex),
    /// Set every channel of a sink to the same raw volume (65536 = 100%)
    SetSinkVolume {
        /// Sink index
        sink: DeviceIndex,
        /// Raw volume
        raw: u32,
    },
    /// Mute or unmute a sink
    SetSinkMute {
        /// Sink index
        sink: DeviceIndex,
        /// Mute state
        muted: bool,
    },
}

impl CliCommand {
    /// Whether the server answers this command with a listing worth draining
    pub fn expects_response(&self) -> bool {
        matches!(
            self,
            CliCommand::ListModules | CliCommand::ListSinks | CliCommand::ListSources
        )
    }

    /// Whether the command changes server state
    pub fn is_mutation(&self) -> bool {
        !self.expects_response()
    }
}

impl fmt::Display for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliCommand::ListModules => write!(f, "list-modules"),
            CliCommand::ListSinks => write!(f, "list-sinks"),
            CliCommand::ListSources => write!(f, "list-sources"),
            CliCommand::LoadLoopback { sink, source } => {
                write!(f, "load-module {LOOPBACK_MODULE} sink={sink} source={source}")
            }
            CliCommand::UnloadModule(index) => write!(f, "unload-module {index}"),
            CliCommand::SetSinkVolume { sink, raw } => write!(f, "set-sink-volume {sink} {raw}"),
            CliCommand::SetSinkMute { sink, muted } => {
                write!(f, "set-sink-mute {sink} {}", u8::from(*muted))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_wire_lines() {
        let load = CliCommand::LoadLoopback {
            sink: "out".to_string(),
            source: "in".to_string(),
        };
        assert_eq!(
            load.to_string(),
            "load-module module-loopback sink=out source=in"
        );
        assert_eq!(
            CliCommand::UnloadModule(ModuleIndex(12)).to_string(),
            "unload-module 12"
        );
        assert_eq!(
            CliCommand::SetSinkMute {
                sink: DeviceIndex(2),
                muted: true
            }
            .to_string(),
            "set-sink-mute 2 1"
        );
    }

    #[test]
    fn only_listings_expect_a_response() {
        assert!(CliCommand::ListModules.expects_response());
        assert!(!CliCommand::UnloadModule(ModuleIndex(1)).expects_response());
        assert!(CliCommand::UnloadModule(ModuleIndex(1)).is_mutation());
    }
}
