//! Background clock subsystem
//!
//! A [`TimerFacade`] owns one [`ClockBackend`], chosen once at construction:
//! the isolated backend runs the clock engine on its own thread and talks to
//! it over channels, the inline backend ticks on the host runtime.

pub mod engine;
pub mod facade;
pub mod inline;
pub mod isolated;
pub mod protocol;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use engine::{run_engine, ClockEngine};
pub use facade::{Capabilities, TimerFacade, Visibility};
pub use inline::InlineBackend;
pub use isolated::IsolatedBackend;
pub use protocol::{EngineCommand, EngineEvent};

/// Which backend a façade selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Isolated,
    Inline,
}

/// Control surface implemented by both clock backends.
///
/// Every operation is fire-and-forget; the resulting state shows up in the
/// façade's cache either immediately (inline) or once the engine replies
/// (isolated).
pub trait ClockBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Resume advancing from the current elapsed time
    fn start(&self);

    fn pause(&self);

    fn reset(&self);

    fn set_time(&self, time: u64);

    /// Ask the authoritative counter to report its current state
    fn resync(&self);

    /// Stop ticking and release any execution context. Idempotent.
    fn shutdown(&self);
}
