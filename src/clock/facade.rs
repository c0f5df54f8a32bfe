//! Timer façade: the single control surface over the active clock backend

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{BackendKind, ClockBackend, InlineBackend, IsolatedBackend};
use crate::state::TimerState;

/// What the host environment can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether an isolated execution context (a dedicated thread) may be created
    pub isolated_context: bool,
}

impl Capabilities {
    /// Probe the current target
    pub fn detect() -> Self {
        Self {
            isolated_context: cfg!(not(target_family = "wasm")),
        }
    }

    /// A host that can only run the inline backend
    pub fn inline_only() -> Self {
        Self {
            isolated_context: false,
        }
    }
}

/// Host foreground visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Owns the selected backend and a cached copy of its state.
///
/// The backend is chosen once in [`TimerFacade::new`]. Callers only ever
/// read the cache; it is written by the backend or by engine notifications.
pub struct TimerFacade {
    backend: Box<dyn ClockBackend>,
    cache: Arc<watch::Sender<TimerState>>,
    observer: watch::Receiver<TimerState>,
}

impl TimerFacade {
    /// Select a backend and set it up. Must be called inside a tokio runtime.
    ///
    /// Failing to create the isolated backend is not an error: it is logged
    /// and the inline backend is used instead.
    pub fn new(capabilities: Capabilities, tick_period: Duration) -> Self {
        let (tx, observer) = watch::channel(TimerState::new());
        let cache = Arc::new(tx);

        let backend: Box<dyn ClockBackend> = if capabilities.isolated_context {
            match IsolatedBackend::spawn(tick_period, Arc::clone(&cache)) {
                Ok(backend) => Box::new(backend),
                Err(e) => {
                    warn!("Isolated clock unavailable, falling back to inline timer: {:#}", e);
                    Box::new(InlineBackend::new(tick_period, Arc::clone(&cache)))
                }
            }
        } else {
            debug!("Host has no isolated context, using inline timer");
            Box::new(InlineBackend::new(tick_period, Arc::clone(&cache)))
        };

        Self::with_backend(backend, cache, observer)
    }

    fn with_backend(
        backend: Box<dyn ClockBackend>,
        cache: Arc<watch::Sender<TimerState>>,
        observer: watch::Receiver<TimerState>,
    ) -> Self {
        info!("Timer facade ready with {:?} backend", backend.kind());
        Self {
            backend,
            cache,
            observer,
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn start(&self) {
        debug!("Timer start requested");
        self.backend.start();
    }

    pub fn pause(&self) {
        debug!("Timer pause requested");
        self.backend.pause();
    }

    pub fn reset(&self) {
        debug!("Timer reset requested");
        self.backend.reset();
    }

    pub fn set_time(&self, time: u64) {
        debug!("Timer set to {}s", time);
        self.backend.set_time(time);
    }

    /// Latest state received from the backend; `(0, false)` before any
    pub fn observe(&self) -> TimerState {
        *self.observer.borrow()
    }

    /// Receiver notified on every cache change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.cache.subscribe()
    }

    /// Request the authoritative state. The cache updates once the reply arrives.
    pub fn resync(&self) {
        debug!("Resynchronizing timer cache");
        self.backend.resync();
    }

    /// Host visibility notification. Only regaining visibility with an
    /// isolated backend needs a resync; the inline backend cannot drift.
    pub fn on_visibility_change(&self, visibility: Visibility) {
        if visibility == Visibility::Visible && self.backend.kind() == BackendKind::Isolated {
            info!("Host visible again, resynchronizing timer");
            self.resync();
        }
    }

    /// Stop ticking and release the backend's execution context
    pub fn shutdown(&self) {
        self.backend.shutdown();
    }
}

impl Drop for TimerFacade {
    fn drop(&mut self) {
        self.backend.shutdown();
    }
}
