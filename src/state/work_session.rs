//! Completed work session records

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_hms;

/// One finished, timed work interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSession {
    /// Milliseconds since the epoch at which the session was saved
    pub id: i64,
    pub duration_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub formatted_time: String,
    pub activity_detail: String,
}

impl WorkSession {
    /// Build a session ending at `ended_at`.
    ///
    /// Without a known start (the timer was paused in between) the start is
    /// derived from the timed duration.
    pub fn new(
        duration_seconds: u64,
        started_at: Option<DateTime<Utc>>,
        ended_at: DateTime<Utc>,
        activity_detail: &str,
    ) -> Self {
        let started_at = started_at.unwrap_or_else(|| {
            let seconds = i64::try_from(duration_seconds).unwrap_or(i64::MAX);
            ended_at - ChronoDuration::try_seconds(seconds).unwrap_or(ChronoDuration::zero())
        });

        Self {
            id: ended_at.timestamp_millis(),
            duration_seconds,
            started_at,
            ended_at,
            formatted_time: format_hms(duration_seconds),
            activity_detail: activity_detail.trim().to_string(),
        }
    }
}
