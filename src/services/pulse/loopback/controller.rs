use tracing::{info, instrument, warn};

use super::{
    ModuleStateCache,
    plan::{LoopbackAction, first_connected, plan_reconcile},
};
use crate::services::pulse::{
    PulseError,
    device::ModuleIndex,
    protocol::{CliCommand, ControlChannel, ProtocolClient},
};

/// Loopback routing over the text control protocol
///
/// Owns a control channel and the module cache fed by it. Mutations never
/// wait for the server to confirm; they mark the cache stale so the next
/// refresh observes the result.
#[derive(Debug)]
pub struct LoopbackController<C = ProtocolClient> {
    channel: C,
    cache: ModuleStateCache,
}

impl<C: ControlChannel> LoopbackController<C> {
    /// Controller with a fresh cache
    pub fn new(channel: C) -> Self {
        Self::with_cache(channel, ModuleStateCache::new())
    }

    /// Controller around an existing cache
    pub fn with_cache(channel: C, cache: ModuleStateCache) -> Self {
        Self { channel, cache }
    }

    /// The underlying channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The module cache
    pub fn cache(&self) -> &ModuleStateCache {
        &self.cache
    }

    /// Throttled module re-scan, see [`ModuleStateCache::refresh`]
    ///
    /// # Errors
    /// Propagates transport errors
    pub fn refresh(&mut self, force: bool) -> Result<bool, PulseError> {
        self.cache.refresh(&self.channel, force)
    }

    /// Force the next refresh to scan
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Load a loopback routing `source` into `sink`
    ///
    /// # Errors
    /// Propagates transport errors; server-side failures are not observed
    #[instrument(skip(self))]
    pub fn connect(&mut self, sink: &str, source: &str) -> Result<(), PulseError> {
        self.send_mutation(&CliCommand::LoadLoopback {
            sink: sink.to_string(),
            source: source.to_string(),
        })
    }

    /// Unload a module
    ///
    /// # Errors
    /// Propagates transport errors
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, module: ModuleIndex) -> Result<(), PulseError> {
        self.send_mutation(&CliCommand::UnloadModule(module))
    }

    /// Send any state-changing command and mark the cache stale
    ///
    /// # Errors
    /// Propagates transport errors
    pub fn send_mutation(&mut self, command: &CliCommand) -> Result<(), PulseError> {
        let result = self.channel.send_command(command).map(|_| ());
        self.cache.invalidate();
        result
    }

    /// Cached module index for a pair
    pub fn lookup_module_index(&self, sink: &str, source: &str) -> Option<ModuleIndex> {
        self.cache.lookup_module_index(sink, source)
    }

    /// First candidate source with a loopback into `sink`, from the cache
    pub fn is_connected<'a, S: AsRef<str>>(&self, sink: &str, candidates: &'a [S]) -> Option<&'a str> {
        first_connected(candidates, |source| self.lookup_module_index(sink, source))
    }

    /// Make `desired` the only candidate routed into `sink`
    ///
    /// Re-scans first, then unloads every other candidate's loopback and
    /// loads the desired one if missing. Steps run independently: a failed
    /// step is logged and the remaining steps still run. The first failure is
    /// returned after all steps were attempted.
    ///
    /// # Errors
    /// Returns the scan error, or the first failed step's error
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub fn reconcile_single_source<S: AsRef<str>>(
        &mut self,
        sink: &str,
        desired: Option<&str>,
        candidates: &[S],
    ) -> Result<Vec<LoopbackAction>, PulseError> {
        self.refresh(true)?;

        let actions = plan_reconcile(sink, desired, candidates, |source| {
            self.lookup_module_index(sink, source)
        });

        let mut first_error = None;
        for action in &actions {
            info!(%action, "Reconciling loopback");
            let result = match action {
                LoopbackAction::Unload { module, .. } => self.disconnect(*module),
                LoopbackAction::Load { sink, source } => self.connect(sink, source),
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
    }
}
