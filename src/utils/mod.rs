//! Utility functions module
//!
//! This module contains signal handling and duration formatting used
//! throughout the application.

pub mod signals;
pub mod time_format;

// Re-export main functions
pub use signals::{continue_signals, shutdown_signal};
pub use time_format::{format_hms, format_readable, format_uptime};
