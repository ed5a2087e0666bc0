//! Loopback routing commands.
mod modules;
mod power;
mod select;
mod status;

use std::sync::Arc;

pub use modules::ModulesCommand;
pub use power::{ConnectCommand, DisconnectCommand};
pub use select::SelectCommand;
pub use status::StatusCommand;

use crate::{cli::CommandRegistry, service_manager::Services};

/// Registers the "loopback" category.
pub fn register_commands(registry: &mut CommandRegistry, services: &Arc<Services>) {
    const CATEGORY_NAME: &str = "loopback";

    registry.register_command(CATEGORY_NAME, Box::new(StatusCommand::new(services.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(SelectCommand::new(services.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ConnectCommand::new(services.clone())));
    registry.register_command(
        CATEGORY_NAME,
        Box::new(DisconnectCommand::new(services.clone())),
    );
    registry.register_command(CATEGORY_NAME, Box::new(ModulesCommand::new(services.clone())));
}
