use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::{format_command, format_description, format_error, format_header},
        types::{ArgType, CommandArg, CommandMetadata},
    },
    service_manager::Services,
};

/// Prints the effective configuration and checks each server
pub struct ShowCommand {
    services: Arc<Services>,
}

impl ShowCommand {
    /// Creates a new ShowCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    /// One line per server: reachable with its device counts, or the error
    async fn server_report(&self) -> Vec<String> {
        let mut lines = vec![format_header("Servers")];

        for bridge in &self.services.bridges {
            let status = match bridge.verify_server().await {
                Ok((sinks, sources)) => {
                    let config = &self.services.config;
                    let missing: Vec<&str> = config
                        .players
                        .iter()
                        .map(|player| (&player.server, player.sink_name.as_str()))
                        .chain(
                            config
                                .switches
                                .iter()
                                .map(|switch| (&switch.server, switch.sink_name.as_str())),
                        )
                        .filter(|(server, _)| server.server_id() == bridge.server_id())
                        .map(|(_, name)| name)
                        .filter(|name| !sinks.iter().any(|sink| sink.name == *name))
                        .collect();

                    let mut status = format_description(&format!(
                        "{} sinks, {} sources",
                        sinks.len(),
                        sources.len()
                    ));
                    if !missing.is_empty() {
                        status.push_str(&format!(" missing: {}", missing.join(", ")));
                    }
                    status
                }
                Err(e) => format_error(&e.to_string()),
            };

            lines.push(format!("  {} {status}", format_command(bridge.server_id())));
        }

        lines
    }
}

#[async_trait]
impl Command for ShowCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let verify = match args.first().map(String::as_str) {
            None => true,
            Some("--offline") => false,
            Some(other) => {
                return Err(CliError::InvalidArgument {
                    arg: "mode".to_string(),
                    reason: format!("unknown option '{other}'"),
                });
            }
        };

        let rendered = toml::to_string_pretty(&self.services.config)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let mut lines = vec![
            format_header(&self.services.config_path.display().to_string()),
            rendered.trim_end().to_string(),
        ];

        if verify && !self.services.bridges.is_empty() {
            lines.push(String::new());
            lines.extend(self.server_report().await);
        }

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "show".to_string(),
            description: "Show the effective configuration and server reachability".to_string(),
            category: "config".to_string(),
            args: vec![CommandArg::optional(
                "mode",
                "--offline skips contacting servers",
                ArgType::String,
            )],
            examples: vec![
                "pulselink config show".to_string(),
                "pulselink config show --offline".to_string(),
            ],
        }
    }
}
