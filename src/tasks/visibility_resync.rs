//! Timer resynchronization when the host regains the foreground

use std::sync::Arc;

use futures::stream::StreamExt;
use tracing::{debug, info, warn};

use crate::{clock::Visibility, state::AppState, utils::continue_signals};

/// Forward every visibility transition to the timer façade.
///
/// Ends when the visibility sender is dropped.
pub async fn visibility_resync_task(state: Arc<AppState>) {
    info!("Starting visibility resync task");

    let mut visibility_rx = state.visibility_tx.subscribe();

    while visibility_rx.changed().await.is_ok() {
        let visibility = *visibility_rx.borrow_and_update();
        debug!("Visibility is now {:?}", visibility);
        state.timer.on_visibility_change(visibility);
    }

    debug!("Visibility channel closed");
}

/// Treat SIGCONT as the process coming back to the foreground
pub async fn resume_signal_task(state: Arc<AppState>) {
    let mut signals = match continue_signals() {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Resume signals unavailable, relying on visibility updates: {}", e);
            return;
        }
    };

    info!("Starting resume signal task");
    while signals.next().await.is_some() {
        info!("Process resumed, resynchronizing timer");
        state.timer.on_visibility_change(Visibility::Visible);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::clock::Capabilities;

    #[tokio::test]
    async fn regaining_visibility_pulls_engine_time() {
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            Capabilities::detect(),
            Duration::from_millis(10),
        ));
        tokio::spawn(visibility_resync_task(Arc::clone(&state)));

        state.set_timer(42).await.unwrap();
        // Let the engine's own reply land before listening
        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut rx = state.timer.subscribe();

        state.set_visibility(Visibility::Hidden);
        state.set_visibility(Visibility::Visible);

        // A paused engine only reports again when asked for its current time
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("no resync reply")
            .unwrap();
        assert_eq!(*rx.borrow(), crate::state::TimerState::paused(42));

        state.shutdown();
    }
}
