//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    clock::BackendKind,
    state::{TimerState, WorkSession},
};

/// Response for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
    pub formatted_time: String,
}

impl TimerResponse {
    /// Create a response whose status follows the timer's run flag
    pub fn new(message: String, timer: TimerState) -> Self {
        Self {
            status: if timer.is_running { "running" } else { "paused" }.to_string(),
            message,
            timestamp: Utc::now(),
            formatted_time: timer.formatted(),
            timer,
        }
    }
}

/// Response for a saved work session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: WorkSession,
}

impl SessionResponse {
    pub fn saved(session: WorkSession) -> Self {
        Self {
            status: "saved".to_string(),
            message: format!("Saved session of {}", session.formatted_time),
            timestamp: Utc::now(),
            session,
        }
    }
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub formatted_time: String,
    pub readable_time: String,
    pub backend: BackendKind,
    pub run_started_at: Option<DateTime<Utc>>,
    pub sessions_saved: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of `POST /stop`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopRequest {
    #[serde(default)]
    pub activity_detail: String,
}

/// Body of `POST /time`
#[derive(Debug, Clone, Deserialize)]
pub struct SetTimeRequest {
    pub time: u64,
}

/// Body of `POST /visibility`
#[derive(Debug, Clone, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}
