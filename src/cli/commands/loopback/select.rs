use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        commands::unknown_device,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    service_manager::Services,
    services::pulse::{PowerControl, PulseError, SourceSelector},
};

/// Routes one configured source into a player's sink
pub struct SelectCommand {
    services: Arc<Services>,
}

impl SelectCommand {
    /// Creates a new SelectCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Command for SelectCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (name, source) = (&args[0], &args[1]);

        self.services.refresh().await;

        let mut players = self.services.players.lock().await;
        let player = players
            .iter_mut()
            .find(|player| player.name() == name)
            .ok_or_else(|| unknown_device(name))?;

        player.select_source(source).await.map_err(|e| match e {
            PulseError::UnknownSource(_) => CliError::InvalidArgument {
                arg: "source".to_string(),
                reason: format!(
                    "'{source}' is not one of: {}",
                    player.source_list().join(", ")
                ),
            },
            e => CliError::pulse(e),
        })?;

        Ok(format!("{name} now plays {source}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "select".to_string(),
            description: "Make a source the only one feeding a player".to_string(),
            category: "loopback".to_string(),
            args: vec![
                CommandArg::required("player", "Player name", ArgType::String),
                CommandArg::required("source", "Source display name", ArgType::String),
            ],
            examples: vec!["pulselink loopback select \"Living Room\" Turntable".to_string()],
        }
    }
}
