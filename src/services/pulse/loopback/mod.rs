//! Loopback routing: module cache, reconcile planning and the text-protocol
//! controller.

/// Throttled `list-modules` snapshot and pair lookup
pub mod cache;
/// Load/unload/reconcile over a control channel
pub mod controller;
/// Pure reconcile planning shared by both client variants
pub mod plan;

pub use cache::{MIN_TIME_BETWEEN_FORCED_SCANS, MIN_TIME_BETWEEN_SCANS, ModuleStateCache};
pub use controller::LoopbackController;
pub use plan::{LoopbackAction, first_connected, plan_reconcile};
