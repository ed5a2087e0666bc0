//! Configuration inspection commands.
mod files;
mod schema;
mod show;

use std::sync::Arc;

pub use files::FilesCommand;
pub use schema::SchemaCommand;
pub use show::ShowCommand;

use crate::{cli::CommandRegistry, service_manager::Services};

/// Registers the "config" category.
pub fn register_commands(registry: &mut CommandRegistry, services: &Arc<Services>) {
    const CATEGORY_NAME: &str = "config";

    registry.register_command(CATEGORY_NAME, Box::new(ShowCommand::new(services.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(FilesCommand::new(services.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(SchemaCommand));
}
