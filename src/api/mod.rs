//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and request/response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/stop", post(stop_handler))
        .route("/time", post(set_time_handler))
        .route("/visibility", post(visibility_handler))
        .route("/status", get(status_handler))
        .route("/sessions", get(sessions_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::clock::Capabilities;

    fn app() -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(
            20554,
            "127.0.0.1".to_string(),
            Capabilities::inline_only(),
            Duration::from_secs(1),
        ));
        (create_router(Arc::clone(&state)), state)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test(start_paused = true)]
    async fn start_pause_and_status() {
        let (app, _state) = app();

        let (status, body) = call(&app, "POST", "/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");

        tokio::time::sleep(Duration::from_millis(65_500)).await;

        let (status, body) = call(&app, "POST", "/pause", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "paused");
        assert_eq!(body["timer"], json!({ "elapsed_seconds": 65, "is_running": false }));
        assert_eq!(body["formatted_time"], "00:01:05");

        let (status, body) = call(&app, "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "inline");
        assert_eq!(body["readable_time"], "1m");
        assert_eq!(body["last_action"], "pause");
        assert_eq!(body["run_started_at"], Value::Null);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_saves_session_and_resets() {
        let (app, _state) = app();

        call(&app, "POST", "/start", None).await;
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let (status, body) = call(
            &app,
            "POST",
            "/stop",
            Some(json!({ "activity_detail": "fixed login bug" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["duration_seconds"], 3);
        assert_eq!(body["session"]["activity_detail"], "fixed login bug");

        let (_, body) = call(&app, "GET", "/status", None).await;
        assert_eq!(body["timer"], json!({ "elapsed_seconds": 0, "is_running": false }));
        assert_eq!(body["sessions_saved"], 1);

        let (_, body) = call(&app, "GET", "/sessions", None).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_elapsed_time_conflicts() {
        let (app, _state) = app();
        let (status, _) = call(&app, "POST", "/stop", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test(start_paused = true)]
    async fn set_time_and_visibility() {
        let (app, state) = app();

        let (status, body) = call(&app, "POST", "/time", Some(json!({ "time": 3600 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["formatted_time"], "01:00:00");

        let (status, _) = call(&app, "POST", "/visibility", Some(json!({ "visible": false }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*state.visibility_tx.borrow(), crate::clock::Visibility::Hidden);
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (app, _state) = app();
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
