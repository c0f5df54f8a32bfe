//! Clock engine state machine and its driver loop

use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, Interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::protocol::{EngineCommand, EngineEvent};

/// Authoritative counter for the isolated backend.
///
/// Pure state machine: `handle` applies one command and `tick` advances the
/// counter, each returning the notification to emit, if any.
#[derive(Debug, Default)]
pub struct ClockEngine {
    time: u64,
    running: bool,
}

impl ClockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply a command. Returns `None` for commands that emit nothing,
    /// including no-op start and pause.
    pub fn handle(&mut self, command: EngineCommand) -> Option<EngineEvent> {
        match command {
            EngineCommand::Start { initial_time } => {
                if self.running {
                    debug!("Start ignored, engine already running");
                    return None;
                }
                self.running = true;
                self.time = initial_time;
                None
            }
            EngineCommand::Pause => {
                if !self.running {
                    debug!("Pause ignored, engine not running");
                    return None;
                }
                self.running = false;
                Some(EngineEvent::Paused { time: self.time })
            }
            EngineCommand::Reset => {
                self.running = false;
                self.time = 0;
                Some(EngineEvent::Reset { time: 0 })
            }
            EngineCommand::QueryCurrentTime => Some(EngineEvent::CurrentTime {
                time: self.time,
                is_running: self.running,
            }),
            EngineCommand::SetTime { time } => {
                self.time = time;
                Some(EngineEvent::TimeSet { time })
            }
        }
    }

    /// Advance by one second if running
    pub fn tick(&mut self) -> Option<EngineEvent> {
        if !self.running {
            return None;
        }
        self.time = self.time.saturating_add(1);
        Some(EngineEvent::Tick { time: self.time })
    }
}

/// Drive a [`ClockEngine`] until shutdown or until either channel closes.
///
/// Commands are applied strictly in arrival order. The tick interval only
/// exists while the engine is running, so a paused engine never wakes up.
pub async fn run_engine(
    mut commands: mpsc::UnboundedReceiver<EngineCommand>,
    events: mpsc::UnboundedSender<EngineEvent>,
    period: Duration,
    shutdown: CancellationToken,
) {
    info!("Clock engine started (tick period {:?})", period);

    let mut engine = ClockEngine::new();
    let mut ticker: Option<Interval> = None;

    loop {
        let event = tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("Command channel closed");
                    break;
                };
                debug!(?command, "Engine received command");

                let was_running = engine.is_running();
                let event = engine.handle(command);
                match (was_running, engine.is_running()) {
                    (false, true) => ticker = Some(interval_at(Instant::now() + period, period)),
                    (true, false) => ticker = None,
                    _ => {}
                }
                event
            }

            _ = next_tick(&mut ticker) => {
                let event = engine.tick();
                trace!(time = engine.time(), "Engine tick");
                event
            }
        };

        if let Some(event) = event {
            if events.send(event).is_err() {
                debug!("Event channel closed");
                break;
            }
        }
    }

    info!("Clock engine stopped at {}s", engine.time());
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_ignored_while_running() {
        let mut engine = ClockEngine::new();
        assert_eq!(engine.handle(EngineCommand::Start { initial_time: 7 }), None);
        engine.tick();
        assert_eq!(engine.handle(EngineCommand::Start { initial_time: 0 }), None);
        assert_eq!(engine.time(), 8);
        assert!(engine.is_running());
    }

    #[test]
    fn pause_reports_frozen_time_once() {
        let mut engine = ClockEngine::new();
        engine.handle(EngineCommand::Start { initial_time: 0 });
        engine.tick();
        engine.tick();

        assert_eq!(
            engine.handle(EngineCommand::Pause),
            Some(EngineEvent::Paused { time: 2 })
        );
        assert_eq!(engine.handle(EngineCommand::Pause), None);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.time(), 2);
    }

    #[test]
    fn reset_is_unconditional() {
        let mut engine = ClockEngine::new();
        assert_eq!(
            engine.handle(EngineCommand::Reset),
            Some(EngineEvent::Reset { time: 0 })
        );

        engine.handle(EngineCommand::Start { initial_time: 30 });
        assert_eq!(
            engine.handle(EngineCommand::Reset),
            Some(EngineEvent::Reset { time: 0 })
        );
        assert!(!engine.is_running());
        assert_eq!(engine.time(), 0);
    }

    #[test]
    fn set_time_keeps_run_state() {
        let mut engine = ClockEngine::new();
        engine.handle(EngineCommand::Start { initial_time: 0 });
        assert_eq!(
            engine.handle(EngineCommand::SetTime { time: 100 }),
            Some(EngineEvent::TimeSet { time: 100 })
        );
        assert_eq!(engine.tick(), Some(EngineEvent::Tick { time: 101 }));
    }

    #[test]
    fn tick_saturates_at_the_counter_limit() {
        let mut engine = ClockEngine::new();
        engine.handle(EngineCommand::SetTime { time: u64::MAX });
        engine.handle(EngineCommand::Start { initial_time: u64::MAX });

        assert_eq!(engine.tick(), Some(EngineEvent::Tick { time: u64::MAX }));
        assert_eq!(engine.tick(), Some(EngineEvent::Tick { time: u64::MAX }));
        assert!(engine.is_running());
    }

    #[test]
    fn query_does_not_mutate() {
        let mut engine = ClockEngine::new();
        engine.handle(EngineCommand::SetTime { time: 12 });
        assert_eq!(
            engine.handle(EngineCommand::QueryCurrentTime),
            Some(EngineEvent::CurrentTime {
                time: 12,
                is_running: false
            })
        );
        assert_eq!(engine.time(), 12);
        assert!(!engine.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn loop_ticks_once_per_period_while_running() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let engine = tokio::spawn(run_engine(
            command_rx,
            event_tx,
            Duration::from_secs(1),
            shutdown.clone(),
        ));

        command_tx.send(EngineCommand::Start { initial_time: 10 }).unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        command_tx.send(EngineCommand::Pause).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        command_tx.send(EngineCommand::QueryCurrentTime).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let mut received = Vec::new();
        while let Ok(event) = event_rx.try_recv() {
            received.push(event);
        }
        assert_eq!(
            received,
            vec![
                EngineEvent::Tick { time: 11 },
                EngineEvent::Tick { time: 12 },
                EngineEvent::Tick { time: 13 },
                EngineEvent::Paused { time: 13 },
                EngineEvent::CurrentTime {
                    time: 13,
                    is_running: false
                },
            ]
        );

        shutdown.cancel();
        engine.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn loop_exits_when_commands_close() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let engine = tokio::spawn(run_engine(
            command_rx,
            event_tx,
            Duration::from_secs(1),
            CancellationToken::new(),
        ));

        drop(command_tx);
        engine.await.unwrap();
    }
}
