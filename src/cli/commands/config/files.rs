use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandResult, types::CommandMetadata},
    config::Config,
    service_manager::Services,
};

/// Lists the configuration file and everything it imports
pub struct FilesCommand {
    services: Arc<Services>,
}

impl FilesCommand {
    /// Creates a new FilesCommand
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Command for FilesCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let files = Config::config_files(&self.services.config_path)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        Ok(files
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "files".to_string(),
            description: "List the configuration file and its imports".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["pulselink config files".to_string()],
        }
    }
}
