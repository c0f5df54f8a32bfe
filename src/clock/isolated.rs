//! Isolated backend: the clock engine on a dedicated thread

use std::{
    sync::{Arc, Mutex, PoisonError},
    thread,
    time::Duration,
};

use anyhow::Context;
use tokio::{
    runtime::{self, Handle},
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::{
    engine::run_engine,
    protocol::{EngineCommand, EngineEvent},
    BackendKind, ClockBackend,
};
use crate::state::TimerState;

/// Where the engine loop is running
#[derive(Debug)]
enum EngineContext {
    /// Dedicated OS thread with its own current-thread runtime
    Thread(Option<thread::JoinHandle<()>>),
    /// Task on the host runtime, used to drive the engine on a test clock
    #[cfg(test)]
    Task(JoinHandle<()>),
}

/// Backend that owns no state itself: the engine holds the authoritative
/// counter and a pump task folds its notifications into the façade cache.
#[derive(Debug)]
pub struct IsolatedBackend {
    commands: mpsc::UnboundedSender<EngineCommand>,
    cache: Arc<watch::Sender<TimerState>>,
    shutdown: CancellationToken,
    context: Mutex<EngineContext>,
    pump: JoinHandle<()>,
}

impl IsolatedBackend {
    /// Spawn the engine thread and the event pump.
    ///
    /// Must be called from within a tokio runtime, which hosts the pump.
    /// Construction is all-or-nothing: on any error every resource acquired
    /// so far has already been dropped.
    pub fn spawn(period: Duration, cache: Arc<watch::Sender<TimerState>>) -> anyhow::Result<Self> {
        let host = Handle::try_current().context("no host runtime to receive engine events")?;

        let engine_runtime = runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("failed to build clock engine runtime")?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let token = shutdown.clone();
        let worker = thread::Builder::new()
            .name("clock-engine".to_string())
            .spawn(move || {
                engine_runtime.block_on(run_engine(command_rx, event_tx, period, token));
            })
            .context("failed to spawn clock engine thread")?;

        let pump = host.spawn(pump_events(event_rx, Arc::clone(&cache)));

        info!("Isolated clock engine running on a dedicated thread");
        Ok(Self {
            commands: command_tx,
            cache,
            shutdown,
            context: Mutex::new(EngineContext::Thread(Some(worker))),
            pump,
        })
    }

    /// Run the engine as a task on the current runtime instead of a thread
    #[cfg(test)]
    pub(crate) fn spawn_on_current_runtime(
        period: Duration,
        cache: Arc<watch::Sender<TimerState>>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let engine = tokio::spawn(run_engine(command_rx, event_tx, period, shutdown.clone()));
        let pump = tokio::spawn(pump_events(event_rx, Arc::clone(&cache)));

        Self {
            commands: command_tx,
            cache,
            shutdown,
            context: Mutex::new(EngineContext::Task(engine)),
            pump,
        }
    }

    fn send(&self, command: EngineCommand) {
        if let Err(e) = self.commands.send(command) {
            warn!("Clock engine is gone, dropping {:?}", e.0);
        }
    }
}

impl ClockBackend for IsolatedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Isolated
    }

    fn start(&self) {
        let initial_time = self.cache.borrow().elapsed_seconds;
        self.send(EngineCommand::Start { initial_time });
        // Ticks do not carry the run flag, so mark it here
        self.cache.send_if_modified(|state| {
            let changed = !state.is_running;
            state.is_running = true;
            changed
        });
    }

    fn pause(&self) {
        self.send(EngineCommand::Pause);
        self.cache.send_if_modified(|state| {
            let changed = state.is_running;
            state.is_running = false;
            changed
        });
    }

    fn reset(&self) {
        self.send(EngineCommand::Reset);
        // A start issued before the reply must resume from zero
        self.cache.send_modify(|state| *state = TimerState::new());
    }

    fn set_time(&self, time: u64) {
        self.send(EngineCommand::SetTime { time });
        self.cache.send_modify(|state| state.elapsed_seconds = time);
    }

    fn resync(&self) {
        self.send(EngineCommand::QueryCurrentTime);
    }

    fn shutdown(&self) {
        self.shutdown.cancel();

        let mut context = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *context {
            EngineContext::Thread(worker) => {
                if let Some(worker) = worker.take() {
                    if worker.join().is_err() {
                        warn!("Clock engine thread panicked");
                    }
                    info!("Isolated clock engine terminated");
                }
            }
            #[cfg(test)]
            EngineContext::Task(engine) => engine.abort(),
        }
        drop(context);

        self.pump.abort();
    }
}

impl Drop for IsolatedBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn pump_events(
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    cache: Arc<watch::Sender<TimerState>>,
) {
    while let Some(event) = events.recv().await {
        trace!(?event, "Applying engine event");
        cache.send_modify(|state| event.apply(state));
    }
    debug!("Engine event stream ended");
}
