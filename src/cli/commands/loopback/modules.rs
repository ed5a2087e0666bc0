use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::{format_command, format_description, format_header},
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::{Backend, ServerConfig},
    service_manager::Services,
    services::pulse::{LoopbackController, ModuleInfo, PulseError, device::LOOPBACK_MODULE},
};

/// Lists loopback modules straight from the text protocol
///
/// Bypasses the bridges, so it works for any configured `cli` server even
/// when no device on it is usable.
pub struct ModulesCommand {
    services: Arc<Services>,
}

impl ModulesCommand {
    /// Creates a new ModulesCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    fn loopbacks(server: &ServerConfig) -> Result<Vec<ModuleInfo>, PulseError> {
        let mut controller = LoopbackController::new(server.client());
        controller.refresh(true)?;
        Ok(controller
            .cache()
            .modules()?
            .into_iter()
            .filter(|module| module.name == LOOPBACK_MODULE)
            .collect())
    }
}

#[async_trait]
impl Command for ModulesCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let filter = args.first();
        let servers: Vec<ServerConfig> = self
            .services
            .config
            .servers()
            .into_iter()
            .filter(|server| matches!(server.backend, Backend::Cli))
            .filter(|server| filter.is_none_or(|id| *id == server.server_id()))
            .cloned()
            .collect();

        if let Some(id) = filter
            && servers.is_empty()
        {
            return Err(CliError::InvalidArgument {
                arg: "server".to_string(),
                reason: format!("no cli server '{id}' is configured"),
            });
        }

        let mut lines = Vec::new();
        for server in servers {
            lines.push(format_header(&server.server_id()));

            let lookup = server.clone();
            let modules = task::spawn_blocking(move || Self::loopbacks(&lookup))
                .await
                .map_err(|e| CliError::ServiceError {
                    service: "PulseAudio".to_string(),
                    details: format!("module lookup stopped: {e}"),
                })?;

            match modules {
                Ok(modules) if modules.is_empty() => {
                    lines.push(format!("  {}", format_description("no loopbacks")));
                }
                Ok(modules) => {
                    for module in modules {
                        lines.push(format!(
                            "  {} {}",
                            format_command(&format!("#{}", module.index)),
                            module.argument
                        ));
                    }
                }
                Err(e) => lines.push(format!("  {}", format_description(&e.to_string()))),
            }
        }

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "modules".to_string(),
            description: "List loaded loopback modules per server".to_string(),
            category: "loopback".to_string(),
            args: vec![CommandArg::optional(
                "server",
                "Only this server, as host:port",
                ArgType::String,
            )],
            examples: vec![
                "pulselink loopback modules".to_string(),
                "pulselink loopback modules localhost:4712".to_string(),
            ],
        }
    }
}
