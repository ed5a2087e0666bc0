//! Command-line interface.
//!
//! Commands are grouped by category and run against the services built from
//! the loaded configuration. Help text is generated from command metadata.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;

pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};

#[cfg(test)]
mod tests;
