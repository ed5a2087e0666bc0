use std::sync::Arc;

use async_trait::async_trait;

use super::find_player;
use crate::{
    cli::{
        CliError, Command, CommandResult,
        commands::{parse_state, unavailable},
        types::{ArgType, CommandArg, CommandMetadata},
    },
    service_manager::Services,
    services::pulse::{PowerControl, VolumeController},
};

/// Mutes, unmutes or toggles a player's sink
pub struct MuteCommand {
    services: Arc<Services>,
}

impl MuteCommand {
    /// Creates a new MuteCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Command for MuteCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let name = &args[0];
        let requested = args.get(1).map(|state| parse_state("state", state)).transpose()?;

        self.services.refresh().await;

        let mut players = self.services.players.lock().await;
        let player = find_player(&mut players, name)?;
        if !player.available() {
            return Err(unavailable(name));
        }

        let mute = requested.unwrap_or(!player.is_volume_muted());
        player.mute_volume(mute).await.map_err(CliError::pulse)?;

        Ok(format!("{name} {}", if mute { "muted" } else { "unmuted" }))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "mute".to_string(),
            description: "Mute or unmute a player, toggling when no state is given".to_string(),
            category: "sink".to_string(),
            args: vec![
                CommandArg::required("player", "Player name", ArgType::String),
                CommandArg::optional("state", "on or off", ArgType::Boolean),
            ],
            examples: vec![
                "pulselink sink mute \"Living Room\"".to_string(),
                "pulselink sink mute \"Living Room\" off".to_string(),
            ],
        }
    }
}
