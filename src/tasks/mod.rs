//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod visibility_resync;

// Re-export main functions
pub use visibility_resync::{resume_signal_task, visibility_resync_task};
