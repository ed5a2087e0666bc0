use std::{path::PathBuf, sync::Arc};

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    Result,
    config::Config,
    services::pulse::{
        LoopbackSwitch, PowerControl, PulseBridge, ServerRegistry, SinkPlayer,
    },
};

/// Container for everything built from a configuration
///
/// Holds one bridge per distinct server plus the players and switches on top
/// of them. Devices are behind async mutexes since every state change needs
/// `&mut`.
pub struct Services {
    /// Configuration the services were built from
    pub config: Config,
    /// File the configuration was loaded from
    pub config_path: PathBuf,
    /// Bridge sharing between devices
    pub registry: ServerRegistry,
    /// One bridge per configured server
    pub bridges: Vec<Arc<PulseBridge>>,
    /// Sinks exposed as players
    pub players: Mutex<Vec<SinkPlayer>>,
    /// Loopbacks exposed as switches
    pub switches: Mutex<Vec<LoopbackSwitch>>,
}

impl Services {
    /// Spawn a bridge per server and build every configured device
    ///
    /// No server is contacted until the first refresh.
    ///
    /// # Errors
    /// Returns error if a worker thread cannot be started or a server needs
    /// a backend this build lacks
    pub fn new(config: Config, config_path: PathBuf) -> Result<Self> {
        let registry = ServerRegistry::new(config.general.poll_interval());

        let bridges = config
            .servers()
            .into_iter()
            .map(|server| registry.acquire(server))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut players = Vec::with_capacity(config.players.len());
        for player in &config.players {
            players.push(SinkPlayer::new(player, registry.acquire(&player.server)?));
        }

        let mut switches = Vec::with_capacity(config.switches.len());
        for switch in &config.switches {
            switches.push(LoopbackSwitch::new(switch, registry.acquire(&switch.server)?));
        }

        info!(
            servers = bridges.len(),
            players = players.len(),
            switches = switches.len(),
            "Services created"
        );

        Ok(Self {
            config,
            config_path,
            registry,
            bridges,
            players: Mutex::new(players),
            switches: Mutex::new(switches),
        })
    }

    /// Re-read every server, then every device
    ///
    /// Unreachable servers are logged and leave their devices unavailable.
    pub async fn refresh(&self) {
        let results = join_all(self.bridges.iter().map(|bridge| bridge.refresh())).await;
        for (bridge, result) in self.bridges.iter().zip(results) {
            if let Err(e) = result {
                warn!(server = %bridge.server_id(), error = %e, "Refresh failed");
            }
        }

        let mut players = self.players.lock().await;
        join_all(players.iter_mut().map(|player| player.update())).await;

        let mut switches = self.switches.lock().await;
        join_all(switches.iter_mut().map(|switch| switch.update())).await;
    }

    /// Stop every worker and wait for it to exit
    pub async fn shutdown(&self) {
        for bridge in &self.bridges {
            bridge.shutdown();
        }

        let results = join_all(self.bridges.iter().map(|bridge| bridge.join())).await;
        for (bridge, result) in self.bridges.iter().zip(results) {
            if let Err(e) = result {
                warn!(server = %bridge.server_id(), error = %e, "Worker did not stop cleanly");
            }
        }
    }
}
