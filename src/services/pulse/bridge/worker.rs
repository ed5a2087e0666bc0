use std::{sync::Arc, time::Duration};

use arc_swap::ArcSwap;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, info, warn};

use super::{
    request::{Outcome, Request},
    state::ServerSnapshot,
};
use crate::services::pulse::{PulseError, backend::PulseConnection};

/// Default wait for a request before re-synchronizing anyway
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Loop that owns one server connection
///
/// Every iteration waits up to `poll_interval` for a request, runs it, then
/// re-synchronizes the published snapshot. A connection-loss error from
/// either step tears the connection down; the next iteration reconnects.
pub(crate) struct Worker {
    connection: Box<dyn PulseConnection>,
    requests: Receiver<Request>,
    state: Arc<ArcSwap<ServerSnapshot>>,
    poll_interval: Duration,
}

impl Worker {
    pub(crate) fn new(
        connection: Box<dyn PulseConnection>,
        requests: Receiver<Request>,
        state: Arc<ArcSwap<ServerSnapshot>>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            connection,
            requests,
            state,
            poll_interval,
        }
    }

    pub(crate) fn run(mut self) {
        let server = self.connection.server_id();
        info!(%server, "PulseAudio worker started");

        loop {
            match self.requests.recv_timeout(self.poll_interval) {
                Ok(Request::Shutdown) => {
                    debug!(%server, "Shutdown requested");
                    break;
                }
                Ok(Request::Call(operation)) => {
                    let (outcome, complete) = operation(self.connection.as_mut());
                    if outcome == Outcome::ConnectionLost {
                        self.mark_down();
                        complete();
                        continue;
                    }
                    complete();
                }
                Ok(Request::Synchronize(done)) => {
                    self.synchronize();
                    let _ = done.send(());
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!(%server, "All bridge handles dropped");
                    break;
                }
            }

            self.synchronize();
        }

        self.connection.disconnect();
        info!(%server, "PulseAudio worker stopped");
    }

    fn synchronize(&mut self) {
        if let Err(e) = self.try_synchronize() {
            warn!(server = %self.connection.server_id(), error = %e, "Synchronization failed");
            self.mark_down();
        }
    }

    fn try_synchronize(&mut self) -> Result<(), PulseError> {
        if !self.connection.is_connected() {
            self.publish_connected(false);
            self.connection.connect()?;
        }

        let modules = self.connection.modules(false)?;
        let sinks = self.connection.sinks()?;
        let sources = self.connection.sources()?;

        self.state.store(Arc::new(ServerSnapshot {
            connected: true,
            sinks,
            sources,
            modules,
        }));
        Ok(())
    }

    fn publish_connected(&self, connected: bool) {
        let current = self.state.load();
        if current.connected != connected {
            let mut next = ServerSnapshot::clone(&current);
            next.connected = connected;
            self.state.store(Arc::new(next));
        }
    }

    fn mark_down(&mut self) {
        self.state.store(Arc::new(self.state.load().disconnected()));
        self.connection.disconnect();
    }
}
