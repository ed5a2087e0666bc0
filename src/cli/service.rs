use std::sync::Arc;

use super::{CliError, CommandRegistry};
use crate::service_manager::Services;

/// Entry point for running CLI commands.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a CLI service with every built-in command registered.
    pub fn new(services: Arc<Services>) -> Self {
        let mut registry = CommandRegistry::new();
        registry.register_all_commands(&services);

        CliService { registry }
    }

    /// Executes a command by category and name.
    ///
    /// `help` as the category, or no category at all, prints the overview.
    ///
    /// # Errors
    /// See [`CommandRegistry::execute`]
    pub async fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        if category.is_empty() || category == "help" {
            return Ok(self.registry.help_text());
        }
        self.registry.execute(category, command_name, args).await
    }

}
