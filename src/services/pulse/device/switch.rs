use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use super::{ModuleIndex, PowerControl};
use crate::{
    config::SwitchConfig,
    services::pulse::{PulseError, bridge::PulseBridge},
};

/// One loopback exposed as an on/off switch
#[derive(Debug)]
pub struct LoopbackSwitch {
    name: String,
    sink_name: String,
    source_name: String,
    bridge: Arc<PulseBridge>,
    module: Option<ModuleIndex>,
}

/// Point-in-time view of a switch
#[derive(Debug, Clone, Serialize)]
pub struct SwitchStatus {
    /// Display name
    pub name: String,
    /// Stable identifier
    pub unique_id: String,
    /// Whether the server is reachable
    pub available: bool,
    /// Whether the loopback is loaded
    pub on: bool,
    /// Index of the loaded loopback module
    pub module: Option<ModuleIndex>,
}

impl LoopbackSwitch {
    /// Switch for `config` on `bridge`
    pub fn new(config: &SwitchConfig, bridge: Arc<PulseBridge>) -> Self {
        Self {
            name: config.name.clone(),
            sink_name: config.sink_name.clone(),
            source_name: config.source_name.clone(),
            bridge,
            module: None,
        }
    }

    /// Module currently implementing the switch
    pub fn module(&self) -> Option<ModuleIndex> {
        self.module
    }

    /// Current state as a serializable value
    pub fn status(&self) -> SwitchStatus {
        SwitchStatus {
            name: self.name.clone(),
            unique_id: self.unique_id(),
            available: self.available(),
            on: self.is_on(),
            module: self.module,
        }
    }

    async fn resync(&mut self) -> Result<(), PulseError> {
        self.bridge.refresh().await?;
        self.update().await;
        Ok(())
    }
}

#[async_trait]
impl PowerControl for LoopbackSwitch {
    type Error = PulseError;

    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> String {
        format!(
            "{}-{}-{}",
            self.bridge.server_id(),
            self.sink_name,
            self.source_name
        )
    }

    fn available(&self) -> bool {
        self.bridge.connected()
    }

    fn is_on(&self) -> bool {
        self.module.is_some()
    }

    async fn turn_on(&mut self) -> Result<(), PulseError> {
        if self.is_on() {
            warn!(switch = %self.name, "Switch is already on, ignoring");
            return Ok(());
        }

        self.bridge
            .load_loopback(&self.sink_name, &self.source_name)
            .await?;
        self.resync().await
    }

    async fn turn_off(&mut self) -> Result<(), PulseError> {
        let Some(module) = self.module else {
            warn!(switch = %self.name, "Switch is already off, ignoring");
            return Ok(());
        };

        self.bridge.unload_module(module).await?;
        self.resync().await
    }

    async fn update(&mut self) {
        self.module = self
            .bridge
            .snapshot()
            .loopback(&self.sink_name, &self.source_name);
    }
}
