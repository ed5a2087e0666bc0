use std::fmt;

use crate::services::pulse::device::ModuleIndex;

/// One step of bringing a sink to a single active source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopbackAction {
    /// Unload the loopback currently routing `source`
    Unload {
        /// Source the module routes
        source: String,
        /// Module to unload
        module: ModuleIndex,
    },
    /// Load a loopback routing `source` into `sink`
    Load {
        /// Sink name
        sink: String,
        /// Source name
        source: String,
    },
}

impl fmt::Display for LoopbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopbackAction::Unload { source, module } => {
                write!(f, "unload module {module} ({source})")
            }
            LoopbackAction::Load { sink, source } => write!(f, "load {source} -> {sink}"),
        }
    }
}

/// Work out which loopbacks to unload and load so that only `desired` feeds `sink`
///
/// `lookup` answers which module, if any, currently routes a source into the
/// sink. Unloads come first and the load last. `None` for `desired` turns the
/// sink off. Repeated candidates are considered once.
pub fn plan_reconcile<S, F>(
    sink: &str,
    desired: Option<&str>,
    candidates: &[S],
    lookup: F,
) -> Vec<LoopbackAction>
where
    S: AsRef<str>,
    F: Fn(&str) -> Option<ModuleIndex>,
{
    let mut seen: Vec<&str> = Vec::with_capacity(candidates.len() + 1);
    for source in candidates.iter().map(|source| source.as_ref()).chain(desired) {
        if !seen.contains(&source) {
            seen.push(source);
        }
    }

    let mut actions: Vec<LoopbackAction> = seen
        .iter()
        .filter(|&&source| Some(source) != desired)
        .filter_map(|&source| {
            lookup(source).map(|module| LoopbackAction::Unload {
                source: source.to_string(),
                module,
            })
        })
        .collect();

    if let Some(source) = desired {
        if lookup(source).is_none() {
            actions.push(LoopbackAction::Load {
                sink: sink.to_string(),
                source: source.to_string(),
            });
        }
    }

    actions
}

/// First candidate with a loopback into the sink
pub fn first_connected<'a, S, F>(candidates: &'a [S], lookup: F) -> Option<&'a str>
where
    S: AsRef<str>,
    F: Fn(&str) -> Option<ModuleIndex>,
{
    candidates
        .iter()
        .map(|source| source.as_ref())
        .find(|source| lookup(source).is_some())
}
