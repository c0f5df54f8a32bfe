//! Main application state management

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::{sync::watch, time::timeout};
use tracing::{debug, info};

use super::{TimerState, WorkSession};
use crate::{
    clock::{BackendKind, Capabilities, TimerFacade, Visibility},
    utils::format_uptime,
};

/// How long a command waits for the backend to confirm before answering
/// with the cached state as it stands
const CONVERGENCE_TIMEOUT: Duration = Duration::from_millis(250);

/// Host state: the timer façade plus everything the HTTP layer reports
pub struct AppState {
    pub timer: TimerFacade,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// When the current uninterrupted run began; cleared by pause and reset
    pub run_started_at: Mutex<Option<DateTime<Utc>>>,
    /// Sessions saved during this process lifetime
    pub sessions: Mutex<Vec<WorkSession>>,
    /// Host visibility, watched by the resync task
    pub visibility_tx: watch::Sender<Visibility>,
}

impl AppState {
    /// Create the state and select the clock backend. Must run inside a tokio runtime.
    pub fn new(port: u16, host: String, capabilities: Capabilities, tick_period: Duration) -> Self {
        let (visibility_tx, _) = watch::channel(Visibility::Visible);

        Self {
            timer: TimerFacade::new(capabilities, tick_period),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            run_started_at: Mutex::new(None),
            sessions: Mutex::new(Vec::new()),
            visibility_tx,
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn set_run_started_at(&self, value: Option<DateTime<Utc>>) -> Result<(), String> {
        let mut started = self.run_started_at.lock()
            .map_err(|e| format!("Failed to lock run start time: {}", e))?;
        *started = value;
        Ok(())
    }

    /// Wait until the cached state satisfies `done`, or give up after
    /// [`CONVERGENCE_TIMEOUT`] and return whatever is cached
    async fn converge<F>(&self, done: F) -> TimerState
    where
        F: FnMut(&TimerState) -> bool,
    {
        let mut rx = self.timer.subscribe();
        let confirmed = match timeout(CONVERGENCE_TIMEOUT, rx.wait_for(done)).await {
            Ok(Ok(state)) => Some(*state),
            _ => None,
        };

        confirmed.unwrap_or_else(|| {
            debug!("Timer backend did not confirm within {:?}", CONVERGENCE_TIMEOUT);
            self.timer.observe()
        })
    }

    /// Start or resume the timer
    pub fn start_timer(&self) -> Result<TimerState, String> {
        let was_running = self.timer.observe().is_running;
        self.timer.start();

        if !was_running {
            self.set_run_started_at(Some(Utc::now()))?;
        }
        self.record_action("start");
        info!("Timer started");
        Ok(self.timer.observe())
    }

    /// Pause the timer, keeping elapsed time
    pub async fn pause_timer(&self) -> Result<TimerState, String> {
        self.timer.pause();
        self.set_run_started_at(None)?;
        self.record_action("pause");
        info!("Timer paused");
        Ok(self.converge(|state| !state.is_running).await)
    }

    /// Stop the timer and zero it
    pub async fn reset_timer(&self) -> Result<TimerState, String> {
        self.timer.reset();
        self.set_run_started_at(None)?;
        self.record_action("reset");
        info!("Timer reset");
        Ok(self.converge(|state| *state == TimerState::new()).await)
    }

    /// Overwrite the elapsed time without changing the run state
    pub async fn set_timer(&self, time: u64) -> Result<TimerState, String> {
        self.timer.set_time(time);
        self.record_action("set-time");
        info!("Timer set to {}s", time);
        Ok(self.converge(|state| state.elapsed_seconds == time).await)
    }

    /// Turn the elapsed time into a saved session and reset the timer.
    ///
    /// Returns `Ok(None)` when no time has elapsed.
    pub async fn stop_and_save(&self, activity_detail: &str) -> Result<Option<WorkSession>, String> {
        let elapsed = self.timer.observe().elapsed_seconds;
        if elapsed == 0 {
            debug!("Nothing to save, timer at zero");
            return Ok(None);
        }

        let started_at = self.run_started_at.lock()
            .map_err(|e| format!("Failed to lock run start time: {}", e))?
            .take();
        let session = WorkSession::new(elapsed, started_at, Utc::now(), activity_detail);

        self.reset_timer().await?;

        self.sessions.lock()
            .map_err(|e| format!("Failed to lock sessions: {}", e))?
            .push(session.clone());
        self.record_action("stop");
        info!("Saved work session of {}", session.formatted_time);
        Ok(Some(session))
    }

    /// Record a host visibility change. Repeated values are ignored.
    pub fn set_visibility(&self, visibility: Visibility) {
        let changed = self.visibility_tx.send_if_modified(|current| {
            if *current == visibility {
                return false;
            }
            *current = visibility;
            true
        });

        if changed {
            info!("Host visibility changed to {:?}", visibility);
            self.record_action(match visibility {
                Visibility::Visible => "visible",
                Visibility::Hidden => "hidden",
            });
        }
    }

    /// Get the cached timer state
    pub fn get_timer_state(&self) -> TimerState {
        self.timer.observe()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.timer.backend_kind()
    }

    /// Sessions saved so far, oldest first
    pub fn get_sessions(&self) -> Result<Vec<WorkSession>, String> {
        self.sessions.lock()
            .map(|sessions| sessions.clone())
            .map_err(|e| format!("Failed to lock sessions: {}", e))
    }

    pub fn get_run_started_at(&self) -> Option<DateTime<Utc>> {
        self.run_started_at.lock().ok().and_then(|t| *t)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Release the clock backend
    pub fn shutdown(&self) {
        info!("Releasing timer backend");
        self.timer.shutdown();
    }
}
