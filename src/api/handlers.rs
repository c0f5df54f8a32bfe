//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    clock::Visibility,
    state::{AppState, WorkSession},
    utils::format_readable,
};
use super::responses::{
    HealthResponse, SessionResponse, SetTimeRequest, StatusResponse, StopRequest, TimerResponse,
    VisibilityRequest,
};

/// Handle POST /start - Start or resume the timer
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    match state.start_timer() {
        Ok(timer) => {
            info!("Start endpoint called - timer running from {}", timer.formatted());
            Ok(Json(TimerResponse::new("Timer started".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    match state.pause_timer().await {
        Ok(timer) => {
            info!("Pause endpoint called - timer paused at {}", timer.formatted());
            Ok(Json(TimerResponse::new("Timer paused".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to pause timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Stop the timer and zero it
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    match state.reset_timer().await {
        Ok(timer) => {
            info!("Reset endpoint called");
            Ok(Json(TimerResponse::new("Timer reset".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Save the elapsed time as a work session and reset
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<StopRequest>>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    match state.stop_and_save(&request.activity_detail).await {
        Ok(Some(session)) => {
            info!("Stop endpoint called - session of {} saved", session.formatted_time);
            Ok(Json(SessionResponse::saved(session)))
        }
        Ok(None) => {
            warn!("Stop endpoint called with no elapsed time");
            Err(StatusCode::CONFLICT)
        }
        Err(e) => {
            error!("Failed to save session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /time - Overwrite elapsed seconds
pub async fn set_time_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetTimeRequest>,
) -> Result<Json<TimerResponse>, StatusCode> {
    match state.set_timer(request.time).await {
        Ok(timer) => Ok(Json(TimerResponse::new(
            format!("Timer set to {}", timer.formatted()),
            timer,
        ))),
        Err(e) => {
            error!("Failed to set timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /visibility - Host foreground visibility changed
pub async fn visibility_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VisibilityRequest>,
) -> Json<TimerResponse> {
    let visibility = if request.visible { Visibility::Visible } else { Visibility::Hidden };
    state.set_visibility(visibility);

    Json(TimerResponse::new(
        format!("Visibility set to {:?}", visibility),
        state.get_timer_state(),
    ))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let sessions = match state.get_sessions() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get sessions: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let timer = state.get_timer_state();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        formatted_time: timer.formatted(),
        readable_time: format_readable(timer.elapsed_seconds),
        backend: state.backend_kind(),
        run_started_at: state.get_run_started_at(),
        sessions_saved: sessions.len(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /sessions - Sessions saved by this process
pub async fn sessions_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<WorkSession>>, StatusCode> {
    state.get_sessions().map(Json).map_err(|e| {
        error!("Failed to get sessions: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
