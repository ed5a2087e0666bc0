//! Async front for a server connection owned by a dedicated worker thread.
//!
//! Callers enqueue type-erased operations and await their results; the
//! worker executes them one at a time, in submission order, and keeps a
//! published [`ServerSnapshot`] fresh in between.

mod request;
/// Published server state
pub mod state;
mod worker;

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use arc_swap::ArcSwap;
use crossbeam_channel::Sender;
pub use state::ServerSnapshot;
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};
pub use worker::POLL_INTERVAL;

use self::{request::Request, worker::Worker};
use super::{
    PulseError, Volume,
    backend::PulseConnection,
    device::{DeviceIndex, ModuleIndex, SinkInfo, SourceInfo, find_loopback},
    loopback::{LoopbackAction, plan_reconcile},
};

/// Handle to one server's worker thread
///
/// Dropping the last handle asks the worker to stop. Use
/// [`PulseBridge::shutdown`] and [`PulseBridge::join`] to wait for it.
pub struct PulseBridge {
    server_id: String,
    requests: Sender<Request>,
    state: Arc<ArcSwap<ServerSnapshot>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    stopping: AtomicBool,
}

impl std::fmt::Debug for PulseBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulseBridge")
            .field("server_id", &self.server_id)
            .field("connected", &self.connected())
            .finish()
    }
}

impl PulseBridge {
    /// Start a worker whose connection is built by `factory` on the worker thread
    ///
    /// # Errors
    /// Returns `InitializationFailed` if the thread cannot be spawned
    pub fn spawn<F, C>(
        server_id: impl Into<String>,
        poll_interval: Duration,
        factory: F,
    ) -> Result<Self, PulseError>
    where
        F: FnOnce() -> C + Send + 'static,
        C: PulseConnection + 'static,
    {
        let server_id = server_id.into();
        let (tx, rx) = crossbeam_channel::unbounded();
        let state = Arc::new(ArcSwap::from_pointee(ServerSnapshot::default()));

        let worker_state = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name(format!("pulse-{server_id}"))
            .spawn(move || {
                let connection: Box<dyn PulseConnection> = Box::new(factory());
                Worker::new(connection, rx, worker_state, poll_interval).run();
            })
            .map_err(|e| {
                PulseError::InitializationFailed(format!("cannot spawn worker thread: {e}"))
            })?;

        info!(server = %server_id, "PulseAudio bridge started");
        Ok(Self {
            server_id,
            requests: tx,
            state,
            worker: Mutex::new(Some(handle)),
            stopping: AtomicBool::new(false),
        })
    }

    /// Identity of the server this bridge talks to
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// Run `operation` on the worker and await its result
    ///
    /// # Errors
    /// Returns the operation's error, or `ThreadCommunication` if the worker
    /// stopped before running it
    pub async fn submit<T, F>(&self, operation: F) -> Result<T, PulseError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn PulseConnection) -> Result<T, PulseError> + Send + 'static,
    {
        let (request, rx) = Request::call(operation);
        self.requests
            .send(request)
            .map_err(|_| PulseError::ThreadCommunication)?;
        rx.await.map_err(|_| PulseError::ThreadCommunication)?
    }

    /// Re-synchronize now and wait until the new snapshot is published
    ///
    /// # Errors
    /// Returns `ThreadCommunication` if the worker has stopped
    pub async fn refresh(&self) -> Result<(), PulseError> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(Request::Synchronize(tx))
            .map_err(|_| PulseError::ThreadCommunication)?;
        rx.await.map_err(|_| PulseError::ThreadCommunication)
    }

    /// Ask the worker to stop after the requests already queued
    ///
    /// Only the first call enqueues the stop request.
    pub fn shutdown(&self) {
        if self.stopping.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!(server = %self.server_id, "Stopping PulseAudio bridge");
        if self.requests.send(Request::Shutdown).is_err() {
            debug!(server = %self.server_id, "Worker already gone");
        }
    }

    /// Wait for the worker thread to exit
    ///
    /// Returns immediately if it was already joined.
    ///
    /// # Errors
    /// Returns `ThreadCommunication` if the worker panicked
    pub async fn join(&self) -> Result<(), PulseError> {
        let handle = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(_) => return Err(PulseError::ThreadCommunication),
        };
        let Some(handle) = handle else {
            return Ok(());
        };

        tokio::task::spawn_blocking(move || handle.join())
            .await
            .map_err(|_| PulseError::ThreadCommunication)?
            .map_err(|_| PulseError::ThreadCommunication)
    }

    /// Current published state
    pub fn snapshot(&self) -> Arc<ServerSnapshot> {
        self.state.load_full()
    }

    /// Whether the last synchronization succeeded
    pub fn connected(&self) -> bool {
        self.state.load().connected
    }

    /// Sink from the current snapshot
    pub fn sink(&self, name: &str) -> Option<SinkInfo> {
        self.state.load().sink(name).cloned()
    }

    /// Ask the server for its sinks and sources, bypassing the snapshot
    ///
    /// # Errors
    /// Returns the connection error if the server cannot be queried
    pub async fn verify_server(&self) -> Result<(Vec<SinkInfo>, Vec<SourceInfo>), PulseError> {
        self.submit(|connection| {
            if !connection.is_connected() {
                connection.connect()?;
            }
            Ok((connection.sinks()?, connection.sources()?))
        })
        .await
    }

    /// Load a loopback routing `source` into `sink`
    ///
    /// # Errors
    /// Propagates connection errors
    pub async fn load_loopback(&self, sink: &str, source: &str) -> Result<(), PulseError> {
        let (sink, source) = (sink.to_string(), source.to_string());
        self.submit(move |connection| connection.load_loopback(&sink, &source))
            .await
    }

    /// Unload a module
    ///
    /// # Errors
    /// Propagates connection errors
    pub async fn unload_module(&self, module: ModuleIndex) -> Result<(), PulseError> {
        self.submit(move |connection| connection.unload_module(module))
            .await
    }

    /// Set every channel of `sink` to `level` (1.0 is 100%)
    ///
    /// # Errors
    /// Returns `VolumeConversion` for an out-of-range level, or connection errors
    pub async fn set_sink_volume(&self, sink: &SinkInfo, level: f64) -> Result<(), PulseError> {
        let volume = Volume::try_uniform(level, sink.channels())?;
        let index = sink.index;
        self.submit(move |connection| connection.set_sink_volume(index, &volume))
            .await
    }

    /// Mute or unmute a sink
    ///
    /// # Errors
    /// Propagates connection errors
    pub async fn set_sink_mute(&self, sink: DeviceIndex, muted: bool) -> Result<(), PulseError> {
        self.submit(move |connection| connection.set_sink_mute(sink, muted))
            .await
    }

    /// Make `desired` the only candidate routed into `sink`
    ///
    /// Planning and every step run as one operation on the worker, against
    /// a fresh module list, so concurrent calls cannot interleave. Steps are
    /// best-effort; the first failure is returned after all were attempted.
    ///
    /// # Errors
    /// Returns the module listing error, or the first failed step's error
    #[instrument(skip(self, candidates), fields(server = %self.server_id))]
    pub async fn reconcile(
        &self,
        sink: &str,
        desired: Option<&str>,
        candidates: &[String],
    ) -> Result<Vec<LoopbackAction>, PulseError> {
        let sink = sink.to_string();
        let desired = desired.map(str::to_string);
        let candidates = candidates.to_vec();

        self.submit(move |connection| {
            let modules = connection.modules(true)?;
            let actions = plan_reconcile(&sink, desired.as_deref(), &candidates, |source| {
                find_loopback(&modules, &sink, source)
            });

            let mut first_error = None;
            for action in &actions {
                info!(%action, "Reconciling loopback");
                let result = match action {
                    LoopbackAction::Unload { module, .. } => connection.unload_module(*module),
                    LoopbackAction::Load { sink, source } => connection.load_loopback(sink, source),
                };
                if let Err(e) = result {
                    warn!(%action, error = %e, "Loopback step failed");
                    first_error.get_or_insert(e);
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(actions),
            }
        })
        .await
    }
}

impl Drop for PulseBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}
