use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::{
            format_availability, format_command, format_description, format_header, format_power,
            format_volume,
        },
        types::{ArgType, CommandArg, CommandMetadata},
    },
    service_manager::Services,
    services::pulse::device::{PlayerStatus, SwitchStatus},
};

#[derive(Serialize)]
struct Report {
    players: Vec<PlayerStatus>,
    switches: Vec<SwitchStatus>,
}

/// Shows every configured player and switch
pub struct StatusCommand {
    services: Arc<Services>,
}

impl StatusCommand {
    /// Creates a new StatusCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    fn render(report: &Report) -> String {
        let mut lines = Vec::new();

        if !report.players.is_empty() {
            lines.push(format_header("Players"));
        }
        for player in &report.players {
            let mut line = format!(
                "  {} {}",
                format_command(&player.name),
                format_power(player.on)
            );
            if let Some(source) = &player.source {
                line.push_str(&format!(" {source}"));
            }
            line.push_str(&format!(" {}", format_volume(player.volume)));
            if player.muted {
                line.push_str(" muted");
            }
            line.push_str(&format_availability(player.available));
            lines.push(line);
            lines.push(format!(
                "    {}",
                format_description(&format!("sources: {}", player.source_list.join(", ")))
            ));
        }

        if !report.switches.is_empty() {
            lines.push(format_header("Switches"));
        }
        for switch in &report.switches {
            let module = switch
                .module
                .map(|module| format_description(&format!(" (module {module})")))
                .unwrap_or_default();
            lines.push(format!(
                "  {} {}{}{}",
                format_command(&switch.name),
                format_power(switch.on),
                module,
                format_availability(switch.available)
            ));
        }

        if lines.is_empty() {
            return format_description("No players or switches configured");
        }
        lines.join("\n")
    }
}

#[async_trait]
impl Command for StatusCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let json = match args.first().map(String::as_str) {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(CliError::InvalidArgument {
                    arg: "format".to_string(),
                    reason: format!("expected text or json, got '{other}'"),
                });
            }
        };

        self.services.refresh().await;

        let report = Report {
            players: self
                .services
                .players
                .lock()
                .await
                .iter()
                .map(|player| player.status())
                .collect(),
            switches: self
                .services
                .switches
                .lock()
                .await
                .iter()
                .map(|switch| switch.status())
                .collect(),
        };

        if json {
            serde_json::to_string_pretty(&report).map_err(|e| CliError::ServiceError {
                service: "Output".to_string(),
                details: e.to_string(),
            })
        } else {
            Ok(Self::render(&report))
        }
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "status".to_string(),
            description: "Show players and switches".to_string(),
            category: "loopback".to_string(),
            args: vec![CommandArg::optional(
                "format",
                "text (default) or json",
                ArgType::String,
            )],
            examples: vec![
                "pulselink loopback status".to_string(),
                "pulselink loopback status json".to_string(),
            ],
        }
    }
}
