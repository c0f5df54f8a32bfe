//! Inline backend: ticks on the host runtime

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::{
    sync::watch,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::{BackendKind, ClockBackend};
use crate::state::TimerState;

/// Fallback backend for hosts without an isolated execution context.
///
/// The cache is the authoritative state here and every change is
/// synchronous. Ticks share the host scheduler, so a stalled host loses
/// ticks instead of replaying them.
#[derive(Debug)]
pub struct InlineBackend {
    state: Arc<watch::Sender<TimerState>>,
    period: Duration,
    ticker: Mutex<Option<CancellationToken>>,
}

impl InlineBackend {
    pub fn new(period: Duration, state: Arc<watch::Sender<TimerState>>) -> Self {
        info!("Inline clock backend selected");
        Self {
            state,
            period,
            ticker: Mutex::new(None),
        }
    }

    fn stop_ticker(&self) {
        let mut ticker = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = ticker.take() {
            token.cancel();
        }
    }
}

impl ClockBackend for InlineBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Inline
    }

    fn start(&self) {
        let mut ticker = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if ticker.is_some() {
            debug!("Start ignored, inline timer already running");
            return;
        }

        let token = CancellationToken::new();
        *ticker = Some(token.clone());
        self.state.send_modify(|state| state.is_running = true);

        tokio::spawn(run_ticks(Arc::clone(&self.state), self.period, token));
    }

    fn pause(&self) {
        self.stop_ticker();
        let paused = self.state.send_if_modified(|state| {
            let changed = state.is_running;
            state.is_running = false;
            changed
        });
        if !paused {
            debug!("Pause ignored, inline timer not running");
        }
    }

    fn reset(&self) {
        self.stop_ticker();
        self.state.send_modify(|state| *state = TimerState::new());
    }

    fn set_time(&self, time: u64) {
        self.state.send_modify(|state| state.elapsed_seconds = time);
    }

    fn resync(&self) {
        trace!("Inline backend is always in sync");
    }

    fn shutdown(&self) {
        self.stop_ticker();
    }
}

impl Drop for InlineBackend {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

async fn run_ticks(state: Arc<watch::Sender<TimerState>>, period: Duration, token: CancellationToken) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                // Checked under the watch lock so a concurrent pause wins
                state.send_if_modified(|state| {
                    if token.is_cancelled() || !state.is_running {
                        return false;
                    }
                    state.elapsed_seconds = state.elapsed_seconds.saturating_add(1);
                    true
                });
            }
        }
    }
}
