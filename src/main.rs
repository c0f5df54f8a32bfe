//! Cycle Timer - A work-session timer service
//!
//! This is the main entry point for the cycle-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use cycle_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{resume_signal_task, visibility_resync_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("cycle_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting cycle-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, inline={}",
          config.host, config.port, config.tick_ms, config.inline);

    // Create application state; this selects the clock backend
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.capabilities(),
        config.tick_period(),
    ));
    info!("Clock backend: {:?}", state.backend_kind());

    tokio::spawn(visibility_resync_task(Arc::clone(&state)));
    tokio::spawn(resume_signal_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start      - Start or resume the timer");
    info!("  POST /pause      - Pause the timer");
    info!("  POST /reset      - Reset the timer to zero");
    info!("  POST /stop       - Save the elapsed time as a session and reset");
    info!("  POST /time       - Overwrite elapsed seconds");
    info!("  POST /visibility - Report host visibility");
    info!("  GET  /status     - Current timer and server status");
    info!("  GET  /sessions   - Sessions saved by this process");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
