//! Signal handling for graceful shutdown and foreground resume

use futures::stream::StreamExt;
use signal_hook::consts::{SIGCONT, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{error, info};

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create shutdown signal handler: {}", e);
            // Without a handler the default disposition still terminates us
            return std::future::pending().await;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Stream of SIGCONT deliveries, raised when the process is resumed
/// after being stopped (e.g. brought back to the foreground)
pub fn continue_signals() -> std::io::Result<Signals> {
    Signals::new([SIGCONT])
}
