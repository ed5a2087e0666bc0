//! Sink inspection and volume commands.
mod list;
mod mute;
mod volume;

use std::sync::Arc;

pub use list::ListCommand;
pub use mute::MuteCommand;
pub use volume::VolumeCommand;

use crate::{
    cli::{CliError, CommandRegistry, commands::unknown_device},
    service_manager::Services,
    services::pulse::{PowerControl, SinkPlayer},
};

/// Registers the "sink" category.
pub fn register_commands(registry: &mut CommandRegistry, services: &Arc<Services>) {
    const CATEGORY_NAME: &str = "sink";

    registry.register_command(CATEGORY_NAME, Box::new(ListCommand::new(services.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(VolumeCommand::new(services.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(MuteCommand::new(services.clone())));
}

fn find_player<'a>(players: &'a mut [SinkPlayer], name: &str) -> Result<&'a mut SinkPlayer, CliError> {
    players
        .iter_mut()
        .find(|player| player.name() == name)
        .ok_or_else(|| unknown_device(name))
}
