use std::{
    collections::HashMap,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};

use tracing::debug;

use super::{
    PulseError,
    backend::{CliConnection, PulseConnection},
    bridge::{POLL_INTERVAL, PulseBridge},
};
use crate::config::{Backend, ServerConfig};

/// Shares one bridge per server among every device that uses it
///
/// Holds weak references only: when the last device releases its handle the
/// bridge shuts its worker down, and the next `acquire` starts a new one.
///
/// Releasing does not wait for the old worker. It finishes the request in
/// hand plus anything queued before the release, so for that window two
/// workers may talk to the same server. Each command uses its own
/// connection, so the overlap only reorders commands across the two.
/// Callers that need a strict handover call [`PulseBridge::shutdown`] and
/// [`PulseBridge::join`] before dropping their last handle.
#[derive(Debug)]
pub struct ServerRegistry {
    bridges: Mutex<HashMap<String, Weak<PulseBridge>>>,
    poll_interval: Duration,
}

impl Default for ServerRegistry {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl ServerRegistry {
    /// Empty registry whose workers poll every `poll_interval`
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            bridges: Mutex::new(HashMap::new()),
            poll_interval,
        }
    }

    /// Bridge for the server described by `config`, starting one if needed
    ///
    /// # Errors
    /// Returns `InitializationFailed` if a worker cannot be started or the
    /// backend is not compiled in
    pub fn acquire(&self, config: &ServerConfig) -> Result<Arc<PulseBridge>, PulseError> {
        let server_id = config.server_id();
        match config.backend {
            Backend::Cli => {
                let client = config.client();
                self.acquire_with(&server_id, move || CliConnection::new(client))
            }
            #[cfg(feature = "native")]
            Backend::Native => {
                let server = config.server.clone();
                self.acquire_with(&server_id, move || {
                    super::backend::NativeConnection::new(server)
                })
            }
            #[cfg(not(feature = "native"))]
            Backend::Native => Err(PulseError::InitializationFailed(format!(
                "{server_id}: built without the native backend"
            ))),
        }
    }

    /// Bridge registered under `server_id`, or a new one around `factory`
    ///
    /// `factory` only runs when no live bridge exists.
    ///
    /// # Errors
    /// Returns `InitializationFailed` if the worker thread cannot be spawned
    pub fn acquire_with<F, C>(&self, server_id: &str, factory: F) -> Result<Arc<PulseBridge>, PulseError>
    where
        F: FnOnce() -> C + Send + 'static,
        C: PulseConnection + 'static,
    {
        let mut bridges = self
            .bridges
            .lock()
            .map_err(|_| PulseError::ThreadCommunication)?;
        bridges.retain(|_, bridge| bridge.strong_count() > 0);

        if let Some(bridge) = bridges.get(server_id).and_then(Weak::upgrade) {
            debug!(server = server_id, "Reusing PulseAudio bridge");
            return Ok(bridge);
        }

        let bridge = Arc::new(PulseBridge::spawn(server_id, self.poll_interval, factory)?);
        bridges.insert(server_id.to_string(), Arc::downgrade(&bridge));
        Ok(bridge)
    }

    /// Servers with a live bridge
    pub fn active(&self) -> Vec<String> {
        match self.bridges.lock() {
            Ok(bridges) => {
                let mut active: Vec<String> = bridges
                    .iter()
                    .filter(|(_, bridge)| bridge.strong_count() > 0)
                    .map(|(server_id, _)| server_id.clone())
                    .collect();
                active.sort();
                active
            }
            Err(_) => Vec::new(),
        }
    }
}
