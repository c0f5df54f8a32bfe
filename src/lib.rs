//! Cycle Timer - A work-session timer service
//!
//! This library provides a stopwatch-style timer whose clock engine runs on
//! a dedicated thread when possible and falls back to ticking on the host
//! runtime otherwise, behind a single façade. An HTTP layer exposes it for
//! recording completed work sessions.

pub mod config;
pub mod clock;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use clock::{Capabilities, TimerFacade, Visibility};
pub use state::{AppState, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
