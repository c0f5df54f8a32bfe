//! Message protocol between the façade and the isolated clock engine

use serde::{Deserialize, Serialize};

use crate::state::TimerState;

/// Commands sent from the façade to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineCommand {
    /// Begin ticking from `initial_time`. Ignored while already running.
    Start { initial_time: u64 },
    Pause,
    Reset,
    QueryCurrentTime,
    /// Overwrite the counter without touching the run state
    SetTime { time: u64 },
}

/// Notifications sent from the engine back to the façade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    Tick { time: u64 },
    Paused { time: u64 },
    Reset { time: u64 },
    CurrentTime { time: u64, is_running: bool },
    TimeSet { time: u64 },
}

impl EngineEvent {
    /// Fold this notification into the façade's cached state.
    ///
    /// The run flag is recorded by the façade when it sends start, pause or
    /// reset, so only `CurrentTime` overwrites it. A late `Paused` or `Reset`
    /// must not stop a cache that a later start has already marked running.
    /// Ticks reaching a paused cache were emitted before the pause or reset
    /// and are dropped; the engine's reply carries the frozen time.
    pub fn apply(self, state: &mut TimerState) {
        match self {
            EngineEvent::Tick { time } => {
                if state.is_running {
                    state.elapsed_seconds = time;
                }
            }
            EngineEvent::TimeSet { time }
            | EngineEvent::Paused { time }
            | EngineEvent::Reset { time } => {
                state.elapsed_seconds = time;
            }
            EngineEvent::CurrentTime { time, is_running } => {
                state.elapsed_seconds = time;
                state.is_running = is_running;
            }
        }
    }
}
