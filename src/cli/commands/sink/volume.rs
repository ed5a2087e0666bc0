use std::sync::Arc;

use async_trait::async_trait;

use super::find_player;
use crate::{
    cli::{
        CliError, Command, CommandResult,
        commands::unavailable,
        formatting::format_volume,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    service_manager::Services,
    services::pulse::{PowerControl, VolumeController},
};

enum Change {
    Up,
    Down,
    Set(f64),
}

impl Change {
    fn parse(value: &str) -> Result<Self, CliError> {
        match value {
            "up" => return Ok(Change::Up),
            "down" => return Ok(Change::Down),
            _ => {}
        }

        let percent = value
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| CliError::InvalidArgument {
                arg: "level".to_string(),
                reason: format!("expected up, down or a percentage, got '{value}'"),
            })?;

        if !(0.0..=100.0).contains(&percent) {
            return Err(CliError::InvalidArgument {
                arg: "level".to_string(),
                reason: "must be between 0 and 100".to_string(),
            });
        }
        Ok(Change::Set(percent / 100.0))
    }
}

/// Sets or steps a player's sink volume
pub struct VolumeCommand {
    services: Arc<Services>,
}

impl VolumeCommand {
    /// Creates a new VolumeCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Command for VolumeCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let name = &args[0];
        let change = Change::parse(&args[1])?;

        self.services.refresh().await;

        let mut players = self.services.players.lock().await;
        let player = find_player(&mut players, name)?;
        if !player.available() {
            return Err(unavailable(name));
        }

        let result = match change {
            Change::Up => player.volume_up().await,
            Change::Down => player.volume_down().await,
            Change::Set(level) => player.set_volume_level(level).await,
        };
        result.map_err(CliError::pulse)?;

        Ok(format!(
            "{name} volume {}",
            format_volume(player.volume_level())
        ))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "volume".to_string(),
            description: "Set a player's volume, or step it by 5%".to_string(),
            category: "sink".to_string(),
            args: vec![
                CommandArg::required("player", "Player name", ArgType::String),
                CommandArg::required("level", "up, down or 0-100", ArgType::Number),
            ],
            examples: vec![
                "pulselink sink volume \"Living Room\" 40".to_string(),
                "pulselink sink volume \"Living Room\" up".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_and_percentages() {
        assert!(matches!(Change::parse("up"), Ok(Change::Up)));
        assert!(matches!(Change::parse("down"), Ok(Change::Down)));
        assert!(matches!(Change::parse("40"), Ok(Change::Set(level)) if (level - 0.4).abs() < 1e-9));
        assert!(matches!(Change::parse("100%"), Ok(Change::Set(level)) if (level - 1.0).abs() < 1e-9));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert!(Change::parse("101").is_err());
        assert!(Change::parse("-1").is_err());
        assert!(Change::parse("loud").is_err());
    }
}
