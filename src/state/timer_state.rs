//! Timer state structure shared between the clock backends and the façade

use serde::{Deserialize, Serialize};

use crate::utils::format_hms;

/// Observable timer state: accumulated running time and whether it is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub elapsed_seconds: u64,
    pub is_running: bool,
}

impl TimerState {
    /// Create a stopped timer at zero
    pub fn new() -> Self {
        Self {
            elapsed_seconds: 0,
            is_running: false,
        }
    }

    /// Create a running timer state
    pub fn running(elapsed_seconds: u64) -> Self {
        Self {
            elapsed_seconds,
            is_running: true,
        }
    }

    /// Create a paused timer state
    pub fn paused(elapsed_seconds: u64) -> Self {
        Self {
            elapsed_seconds,
            is_running: false,
        }
    }

    /// Elapsed time as `HH:MM:SS`
    pub fn formatted(&self) -> String {
        format_hms(self.elapsed_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
