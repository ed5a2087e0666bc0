use std::time::{Duration, Instant};

use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::services::pulse::{
    PulseError,
    device::{LOOPBACK_MODULE, ModuleIndex, ModuleInfo},
    protocol::{
        CliCommand, ControlChannel,
        listing::{self, Record},
    },
};

/// Minimum time between two unforced `list-modules` scans
pub const MIN_TIME_BETWEEN_SCANS: Duration = Duration::from_secs(10);

/// Minimum time between two scans even when forced
pub const MIN_TIME_BETWEEN_FORCED_SCANS: Duration = Duration::from_millis(100);

/// Matches one module record against a (sink, source) pair
struct LoopbackMatcher {
    sink: Regex,
    source: Regex,
}

impl LoopbackMatcher {
    fn new(sink: &str, source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            sink: Regex::new(&format!("sink={}", regex::escape(sink)))?,
            source: Regex::new(&format!("source={}", regex::escape(source)))?,
        })
    }

    fn matches(&self, record: &Record<'_>) -> bool {
        record.name() == Some(LOOPBACK_MODULE)
            && record
                .argument()
                .is_some_and(|argument| self.sink.is_match(argument) && self.source.is_match(argument))
    }
}

/// Last `list-modules` reply plus the throttle that guards re-scanning it
#[derive(Debug, Clone)]
pub struct ModuleStateCache {
    snapshot: String,
    last_scan: Option<Instant>,
    min_interval: Duration,
    min_forced_interval: Duration,
}

impl Default for ModuleStateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleStateCache {
    /// Empty cache with the default 10 s / 100 ms throttle
    pub fn new() -> Self {
        Self::with_intervals(MIN_TIME_BETWEEN_SCANS, MIN_TIME_BETWEEN_FORCED_SCANS)
    }

    /// Empty cache with custom throttle intervals
    pub fn with_intervals(min_interval: Duration, min_forced_interval: Duration) -> Self {
        Self {
            snapshot: String::new(),
            last_scan: None,
            min_interval,
            min_forced_interval,
        }
    }

    /// Cache seeded with a listing, as if it had just been scanned
    pub fn from_listing(text: impl Into<String>) -> Self {
        let mut cache = Self::new();
        cache.snapshot = text.into();
        cache.last_scan = Some(Instant::now());
        cache
    }

    /// Re-scan the module list unless the throttle says the snapshot is fresh
    ///
    /// Returns whether a scan was performed. A failed scan keeps the previous
    /// snapshot and does not reset the throttle.
    ///
    /// # Errors
    /// Propagates transport and decoding errors from the channel
    #[instrument(skip(self, channel), fields(server = %channel.server_id()))]
    pub fn refresh<C>(&mut self, channel: &C, force: bool) -> Result<bool, PulseError>
    where
        C: ControlChannel + ?Sized,
    {
        let min_interval = if force {
            self.min_forced_interval
        } else {
            self.min_interval
        };

        if let Some(last) = self.last_scan {
            if last.elapsed() < min_interval {
                debug!("Module scan throttled");
                return Ok(false);
            }
        }

        self.snapshot = channel.send_command(&CliCommand::ListModules)?;
        self.last_scan = Some(Instant::now());
        Ok(true)
    }

    /// Mark the snapshot stale so the next refresh scans regardless of the throttle
    pub fn invalidate(&mut self) {
        self.last_scan = None;
    }

    /// Raw text of the last scan
    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    /// Index of the loopback module routing `source` into `sink`
    ///
    /// Both names are matched as escaped literals inside a single module
    /// record, so text from neighbouring records never combines into a match.
    pub fn lookup_module_index(&self, sink: &str, source: &str) -> Option<ModuleIndex> {
        let matcher = match LoopbackMatcher::new(sink, source) {
            Ok(matcher) => matcher,
            Err(e) => {
                warn!(sink, source, error = %e, "Cannot build module matcher");
                return None;
            }
        };

        listing::records(&self.snapshot)
            .iter()
            .find(|record| matcher.matches(record))
            .and_then(|record| record.index().ok())
            .map(ModuleIndex)
    }

    /// Structured view of the snapshot
    ///
    /// # Errors
    /// Returns `Protocol` if the snapshot contains malformed records
    pub fn modules(&self) -> Result<Vec<ModuleInfo>, PulseError> {
        listing::parse_modules(&self.snapshot)
    }
}
