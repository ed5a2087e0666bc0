//! pulselink - loopback routing and sink control for PulseAudio servers.
//!
//! Configured sinks are exposed as media players whose "source" is whichever
//! configured input is looped back into them, and single loopbacks are
//! exposed as switches. Servers are reached over the text protocol of
//! `module-cli-protocol-tcp` or, with the `native` feature, through libpulse.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pulselink::{config::{Config, ConfigPaths}, service_manager::Services};
//!
//! # async fn run() -> pulselink::Result<()> {
//! let path = ConfigPaths::main_config()?;
//! let services = Arc::new(Services::new(Config::load(&path)?, path)?);
//!
//! services.refresh().await;
//! for player in services.players.lock().await.iter() {
//!     println!("{:?}", player.status());
//! }
//! services.shutdown().await;
//! # Ok(())
//! # }
//! ```

/// Configuration schema, loading and validation.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface.
pub mod cli;

/// PulseAudio services.
pub mod services;

/// Services built from a configuration.
pub mod service_manager;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{PulselinkError, Result};
