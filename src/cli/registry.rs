use std::{collections::HashMap, sync::Arc};

use super::{
    CliError, Command,
    commands::{config, loopback, sink},
    formatting::{format_category, format_command, format_description, format_header},
    types::CommandMetadata,
};
use crate::service_manager::Services;

/// Registry for CLI commands organized by category.
///
/// ```text
/// registry
/// ├── loopback
/// │   ├── connect
/// │   ├── disconnect
/// │   ├── modules
/// │   ├── select
/// │   └── status
/// ├── sink
/// │   ├── list
/// │   ├── mute
/// │   └── volume
/// └── config
///     ├── files
///     ├── schema
///     └── show
/// ```
pub struct CommandRegistry {
    /// category name -> (command name -> command)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            categories: HashMap::new(),
        }
    }

    /// Registers a command in `category` under the name from its metadata,
    /// replacing any command already registered there.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Executes a command by category and name.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category or command is
    /// unknown, `CliError::InvalidArguments` if the argument count does not
    /// fit the command, and whatever the command itself returns.
    pub async fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        let found_command = found_category.get(command_name).ok_or_else(|| {
            CliError::CommandNotFound(format!(
                "Failed to find command '{command_name}' in '{category}'"
            ))
        })?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args).await
    }

    /// All registered commands by category, both sorted alphabetically.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();

        categories
    }

    /// Usage overview for every command.
    pub fn help_text(&self) -> String {
        let mut lines = vec![
            format_header("pulselink"),
            format_description("Usage: pulselink <category> <command> [args...]"),
        ];

        for (category, names) in self.list_commands() {
            lines.push(String::new());
            lines.push(format_category(&category));

            let Some(commands) = self.categories.get(&category) else {
                continue;
            };
            for name in names {
                let Some(command) = commands.get(&name) else {
                    continue;
                };
                let metadata = command.metadata();
                lines.push(format!(
                    "  {} {}",
                    format_command(&Self::usage(&metadata)),
                    format_description(&metadata.description)
                ));
            }
        }

        lines.join("\n")
    }

    fn usage(metadata: &CommandMetadata) -> String {
        metadata
            .args
            .iter()
            .fold(metadata.name.clone(), |usage, arg| {
                if arg.required {
                    format!("{usage} <{}>", arg.name)
                } else {
                    format!("{usage} [{}]", arg.name)
                }
            })
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at least {} arguments, got {} (usage: {} {})",
                required_count,
                args.len(),
                metadata.category,
                Self::usage(metadata),
            )));
        }

        if args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }

    /// Registers every built-in command.
    pub fn register_all_commands(&mut self, services: &Arc<Services>) {
        loopback::register_commands(self, services);
        sink::register_commands(self, services);
        config::register_commands(self, services);
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
