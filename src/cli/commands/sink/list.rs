use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::{format_command, format_description, format_error, format_header, format_volume},
        types::{ArgType, CommandArg, CommandMetadata},
    },
    service_manager::Services,
};

/// Lists live sinks and sources of every configured server
pub struct ListCommand {
    services: Arc<Services>,
}

impl ListCommand {
    /// Creates a new ListCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let filter = args.first();
        let bridges: Vec<_> = self
            .services
            .bridges
            .iter()
            .filter(|bridge| filter.is_none_or(|id| id == bridge.server_id()))
            .collect();

        if let Some(id) = filter
            && bridges.is_empty()
        {
            return Err(CliError::InvalidArgument {
                arg: "server".to_string(),
                reason: format!("no server '{id}' is configured"),
            });
        }

        let mut lines = Vec::new();
        for bridge in bridges {
            lines.push(format_header(bridge.server_id()));

            let (sinks, sources) = match bridge.verify_server().await {
                Ok(listing) => listing,
                Err(e) => {
                    lines.push(format!("  {}", format_error(&e.to_string())));
                    continue;
                }
            };

            lines.push("  Sinks".to_string());
            for sink in sinks {
                let muted = if sink.muted { " muted" } else { "" };
                lines.push(format!(
                    "    {} {} {}{muted}",
                    format_command(&sink.name),
                    format_volume(sink.volume.average()),
                    format_description(&format!("#{} {}", sink.index, sink.description)),
                ));
            }

            lines.push("  Sources".to_string());
            for source in sources {
                lines.push(format!(
                    "    {} {}",
                    format_command(&source.name),
                    format_description(&format!("#{} {}", source.index, source.description)),
                ));
            }
        }

        if lines.is_empty() {
            return Ok(format_description("No servers configured"));
        }
        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "list".to_string(),
            description: "List sinks and sources on configured servers".to_string(),
            category: "sink".to_string(),
            args: vec![CommandArg::optional(
                "server",
                "Only this server, as host:port",
                ArgType::String,
            )],
            examples: vec![
                "pulselink sink list".to_string(),
                "pulselink sink list 192.168.1.20:4712".to_string(),
            ],
        }
    }
}
