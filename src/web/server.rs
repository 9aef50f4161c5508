//! Web server implementation for the Event Stream Server

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::{AppConfig, ServerConfig, StreamsConfig};
use crate::error::{StreamError, StreamResult};
use crate::generators::{ChatEcho, LogReplay, Multiplexed, Progress, Ticker};
use crate::metrics::Metrics;
use crate::models::HealthResponse;
use crate::web::stream::stream_response;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub streams: StreamsConfig,
    pub metrics: Arc<Metrics>,
    pub start_time: Instant,
}

/// Web server serving the SSE stream endpoints, health checks and metrics
pub struct WebServer {
    config: ServerConfig,
    app_state: AppState,
}

impl WebServer {
    /// Create a new web server
    pub fn new(config: AppConfig, metrics: Arc<Metrics>) -> Self {
        let app_state = AppState {
            streams: config.streams,
            metrics,
            start_time: Instant::now(),
        };

        Self {
            config: config.server,
            app_state,
        }
    }

    /// Start the web server
    pub async fn start(self) -> StreamResult<()> {
        let addr = self.config.bind_address;
        let app = self.create_app();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            StreamError::WebServer(format!("Failed to bind to {}: {}", addr, e))
        })?;

        info!("Web server starting on {}", addr);
        info!("Health endpoint: http://{}/health", addr);
        info!("Metrics endpoint: http://{}/metrics", addr);
        info!("Stream endpoints: http://{}/stream/{{basic,logs,progress,multi,chat}}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| StreamError::WebServer(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Create the Axum application with all routes
    pub(crate) fn create_app(&self) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/stream/basic", get(stream_basic))
            .route("/stream/logs", get(stream_logs))
            .route("/stream/progress", get(stream_progress))
            .route("/stream/multi", get(stream_multi))
            .route("/stream/chat", get(stream_chat))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(
                        CorsLayer::new()
                            .allow_origin(Any)
                            .allow_methods(Any)
                            .allow_headers(Any),
                    ),
            )
            .with_state(self.app_state.clone())
    }
}

/// Root endpoint handler
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "event-stream-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "metrics": "/metrics",
            "streams": {
                "basic": "/stream/basic",
                "logs": "/stream/logs",
                "progress": "/stream/progress",
                "multi": "/stream/multi",
                "chat": "/stream/chat?message=..."
            }
        }
    }))
}

/// Health check endpoint handler
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed();
    let response = HealthResponse::healthy(uptime.as_secs());

    (StatusCode::OK, Json(response))
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.export(),
    )
}

/// Ticker stream: `update` events on a fixed cadence, then `done`
async fn stream_basic(State(state): State<AppState>) -> Response {
    stream_response(Ticker::new(&state.streams.ticker), state.metrics.clone())
}

/// Log replay stream: the canned record list, then `complete`
async fn stream_logs(State(state): State<AppState>) -> Response {
    stream_response(LogReplay::new(&state.streams.logs), state.metrics.clone())
}

/// Progress stream: per-step percentage updates, then `done`
async fn stream_progress(State(state): State<AppState>) -> Response {
    stream_response(Progress::new(&state.streams.progress), state.metrics.clone())
}

/// Multiplexed stream: interleaved status, metrics, update and warning events
async fn stream_multi(State(state): State<AppState>) -> Response {
    stream_response(Multiplexed::new(&state.streams.multi), state.metrics.clone())
}

/// Query parameters for the chat stream
#[derive(Debug, Deserialize)]
struct ChatQuery {
    /// Client message echoed into the streamed response; invalid or missing
    /// values fall back to the configured greeting rather than failing
    message: Option<String>,
}

/// Chat stream: word-sized `chunk` events, then `done`
async fn stream_chat(
    Query(params): Query<ChatQuery>,
    State(state): State<AppState>,
) -> Response {
    stream_response(
        ChatEcho::new(&state.streams.chat, params.message.as_deref()),
        state.metrics.clone(),
    )
}
