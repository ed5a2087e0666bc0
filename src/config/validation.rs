use std::collections::HashSet;

use super::{Backend, Config, PlayerConfig, ServerConfig, SwitchConfig};
use crate::{PulselinkError, Result};

/// Largest accepted `server.tcp_timeout`, in seconds
pub const MAX_TCP_TIMEOUT_SECS: u64 = 3600;

/// Largest accepted `server.buffer_size`, in bytes
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024;

impl Config {
    /// Checks values serde cannot express constraints for.
    ///
    /// # Errors
    /// Returns `InvalidConfigField` for the first offending field, or
    /// `ConfigValidation` for duplicate names
    pub fn validate(&self) -> Result<()> {
        if self.general.poll_interval_ms == 0 {
            return Err(PulselinkError::invalid_field(
                "general",
                "poll_interval_ms",
                "must be greater than zero",
            ));
        }

        let mut names = HashSet::new();
        for player in &self.players {
            validate_player(player)?;
            unique_name(&mut names, &player.name)?;
        }
        for switch in &self.switches {
            validate_switch(switch)?;
            unique_name(&mut names, &switch.name)?;
        }
        Ok(())
    }
}

fn unique_name<'a>(names: &mut HashSet<&'a str>, name: &'a str) -> Result<()> {
    if names.insert(name) {
        Ok(())
    } else {
        Err(PulselinkError::ConfigValidation {
            component: name.to_string(),
            details: "device names must be unique".to_string(),
        })
    }
}

fn validate_player(player: &PlayerConfig) -> Result<()> {
    let component = format!("player '{}'", player.name);
    require_text(&component, "name", &player.name)?;
    require_text(&component, "sink_name", &player.sink_name)?;

    if player.sources.is_empty() {
        return Err(PulselinkError::invalid_field(
            component,
            "sources",
            "at least one source is required",
        ));
    }

    let mut labels = HashSet::new();
    for source in &player.sources {
        require_text(&component, "sources.name", &source.name)?;
        require_text(&component, "sources.source_name", &source.source_name)?;
        if !labels.insert(source.name.as_str()) {
            return Err(PulselinkError::invalid_field(
                component,
                "sources.name",
                format!("'{}' is listed twice", source.name),
            ));
        }
    }

    validate_server(&component, &player.server)
}

fn validate_switch(switch: &SwitchConfig) -> Result<()> {
    let component = format!("switch '{}'", switch.name);
    require_text(&component, "name", &switch.name)?;
    require_text(&component, "sink_name", &switch.sink_name)?;
    require_text(&component, "source_name", &switch.source_name)?;
    validate_server(&component, &switch.server)
}

fn validate_server(component: &str, server: &ServerConfig) -> Result<()> {
    match server.backend {
        Backend::Cli => {
            require_text(component, "server.host", &server.host)?;
            if server.port == 0 {
                return Err(PulselinkError::invalid_field(
                    component,
                    "server.port",
                    "must be greater than zero",
                ));
            }
            if !(1..=MAX_BUFFER_SIZE).contains(&server.buffer_size) {
                return Err(PulselinkError::invalid_field(
                    component,
                    "server.buffer_size",
                    format!("must be between 1 and {MAX_BUFFER_SIZE}"),
                ));
            }
            if !(1..=MAX_TCP_TIMEOUT_SECS).contains(&server.tcp_timeout) {
                return Err(PulselinkError::invalid_field(
                    component,
                    "server.tcp_timeout",
                    format!("must be between 1 and {MAX_TCP_TIMEOUT_SECS} seconds"),
                ));
            }
        }
        Backend::Native if !cfg!(feature = "native") => {
            return Err(PulselinkError::invalid_field(
                component,
                "server.backend",
                "built without the native backend",
            ));
        }
        Backend::Native => {}
    }
    Ok(())
}

fn require_text(component: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PulselinkError::invalid_field(component, field, "must not be empty"));
    }
    Ok(())
}
