use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        commands::{unavailable, unknown_device},
        types::{ArgType, CommandArg, CommandMetadata},
    },
    service_manager::Services,
    services::pulse::PowerControl,
};

async fn toggle<D: PowerControl>(device: &mut D, on: bool) -> Result<(), CliError> {
    if !device.available() {
        return Err(unavailable(device.name()));
    }

    let result = if on {
        device.turn_on().await
    } else {
        device.turn_off().await
    };
    result.map_err(CliError::pulse)
}

/// Turns a player or switch on or off; players are searched first
async fn set_power(services: &Services, name: &str, on: bool) -> CommandResult {
    services.refresh().await;

    let state = if on { "on" } else { "off" };

    let mut players = services.players.lock().await;
    if let Some(player) = players.iter_mut().find(|player| player.name() == name) {
        toggle(player, on).await?;
        return Ok(format!("{name} turned {state}"));
    }
    drop(players);

    let mut switches = services.switches.lock().await;
    let switch = switches
        .iter_mut()
        .find(|switch| switch.name() == name)
        .ok_or_else(|| unknown_device(name))?;
    toggle(switch, on).await?;
    Ok(format!("{name} turned {state}"))
}

fn device_arg() -> Vec<CommandArg> {
    vec![CommandArg::required(
        "device",
        "Player or switch name",
        ArgType::String,
    )]
}

/// Turns a device on
///
/// Players restore their last source, else their first configured one.
pub struct ConnectCommand {
    services: Arc<Services>,
}

impl ConnectCommand {
    /// Creates a new ConnectCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Command for ConnectCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        set_power(&self.services, &args[0], true).await
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "connect".to_string(),
            description: "Load the loopback(s) behind a player or switch".to_string(),
            category: "loopback".to_string(),
            args: device_arg(),
            examples: vec!["pulselink loopback connect \"Kitchen Radio\"".to_string()],
        }
    }
}

/// Turns a device off
pub struct DisconnectCommand {
    services: Arc<Services>,
}

impl DisconnectCommand {
    /// Creates a new DisconnectCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Command for DisconnectCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        set_power(&self.services, &args[0], false).await
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "disconnect".to_string(),
            description: "Unload the loopback(s) behind a player or switch".to_string(),
            category: "loopback".to_string(),
            args: device_arg(),
            examples: vec!["pulselink loopback disconnect \"Living Room\"".to_string()],
        }
    }
}
