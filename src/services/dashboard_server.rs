//! Dashboard HTTP server.
//!
//! Embeds an axum HTTP server that renders the dashboard page and exposes a
//! small JSON API over the engine's snapshot. The poll loop is started with
//! the server and stopped with it.

use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::models::{HealthStatus, SystemStatus};
use crate::services::dashboard::{DashboardEngine, DashboardHandle, DashboardState, ViewPhase};
use crate::services::data_source::{DemoSource, LiveSource};
use crate::services::reviews_client::{ReviewsClient, ReviewsClientConfig};
use crate::view::DashboardPage;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

/// Engine wired to the review backend with the demo dataset as fallback.
pub type LiveDashboard = DashboardEngine<LiveSource, DemoSource>;

/// Shared state for the dashboard routes.
#[derive(Clone)]
pub struct DashboardServerState {
    pub engine: Arc<LiveDashboard>,
    pub system_status: Arc<SystemStatus>,

    /// Browser reload interval in seconds.
    pub refresh_secs: u64,
}

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error response body.
#[derive(Serialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Wrapper to make AppError usable as an axum error response.
struct ApiErr(AppError);

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::NetworkUnreachable { .. } => (StatusCode::SERVICE_UNAVAILABLE, "UNREACHABLE"),
            AppError::ServerError { .. } => (StatusCode::BAD_GATEWAY, "SERVER_ERROR"),
            AppError::Validation { .. } => (StatusCode::BAD_GATEWAY, "VALIDATION"),
            AppError::Http { .. } | AppError::Decode { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        (
            status,
            Json(ApiError {
                code: code.to_string(),
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

// ── Response types ───────────────────────────────────────────────────────────

/// JSON view of the dashboard snapshot.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub phase: ViewPhase,
    #[serde(flatten)]
    pub state: DashboardState,
}

#[derive(Serialize)]
struct LocalHealth {
    status: &'static str,
}

// ── Route builder ────────────────────────────────────────────────────────────

/// Build the dashboard router.
pub fn dashboard_routes(state: DashboardServerState) -> Router {
    let api = Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/backend-health", get(get_backend_health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        );

    Router::new()
        .route("/", get(dashboard_page))
        .route("/refresh", post(refresh))
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /: rendered dashboard.
async fn dashboard_page(State(state): State<DashboardServerState>) -> Html<String> {
    let snapshot = state.engine.snapshot().await;
    let page = DashboardPage {
        state: &snapshot,
        system_status: &state.system_status,
        now: Utc::now(),
        refresh_secs: state.refresh_secs,
    };
    Html(page.render())
}

/// POST /refresh: run a fetch cycle now, then show the page.
async fn refresh(State(state): State<DashboardServerState>) -> Redirect {
    log::info!("[server] Manual refresh requested");
    state.engine.refresh().await;
    Redirect::to("/")
}

/// GET /api/dashboard: current snapshot as JSON.
async fn get_dashboard(State(state): State<DashboardServerState>) -> Json<DashboardResponse> {
    let snapshot = state.engine.snapshot().await;
    Json(DashboardResponse {
        phase: snapshot.phase(),
        state: snapshot,
    })
}

/// GET /api/backend-health: backend liveness passthrough.
async fn get_backend_health(
    State(state): State<DashboardServerState>,
) -> Result<Json<HealthStatus>, ApiErr> {
    let health = state.engine.primary().client().health_check().await?;
    Ok(Json(health))
}

/// GET /health: liveness of the dashboard itself.
async fn health() -> Json<LocalHealth> {
    Json(LocalHealth { status: "UP" })
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// Handle to a running dashboard server and its poll loop.
pub struct DashboardServerHandle {
    cancel_token: CancellationToken,
    local_addr: SocketAddr,
    poller: DashboardHandle,
    task: JoinHandle<()>,
}

impl DashboardServerHandle {
    /// Address the server actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the poll loop and shut the server down gracefully.
    pub async fn shutdown(self) {
        log::info!("[server] Stopping server on {}", self.local_addr);
        self.poller.stop();
        self.cancel_token.cancel();
        if let Err(e) = self.task.await {
            log::error!("[server] Server task failed: {}", e);
        }
    }
}

/// Build the live engine, start polling and serve the dashboard.
pub async fn start_dashboard_server(
    config: &DashboardConfig,
) -> Result<DashboardServerHandle, AppError> {
    let client = ReviewsClient::new(ReviewsClientConfig::from(config))?;
    log::info!("[server] Using review API at {}", client.base_url());

    let engine = Arc::new(DashboardEngine::new(
        LiveSource::new(client),
        DemoSource,
        config.failure_policy,
    ));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", config.bind_addr, e)))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| AppError::internal(format!("Failed to read local address: {}", e)))?;

    let poller = engine.start(config.poll_interval());

    let app = dashboard_routes(DashboardServerState {
        engine,
        system_status: Arc::new(SystemStatus::default()),
        refresh_secs: config.poll_interval_secs,
    });

    let cancel_token = CancellationToken::new();
    let cancelled = cancel_token.clone();

    log::info!("[server] Dashboard listening on http://{}", local_addr);

    let task = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            cancelled.cancelled().await;
        });

        if let Err(e) = server.await {
            log::error!("[server] Server error: {}", e);
        }

        log::info!("[server] Server stopped");
    });

    Ok(DashboardServerHandle {
        cancel_token,
        local_addr,
        poller,
        task,
    })
}
