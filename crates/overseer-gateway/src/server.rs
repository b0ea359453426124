use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use overseer_core::OverseerError;
use overseer_orchestrator::{Orchestrator, TaskSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

/// Shared application state.
pub struct AppState {
    /// The engine, shared with the cron trigger.
    pub orchestrator: Arc<Mutex<Orchestrator>>,
    /// Requirement used by `POST /refresh`.
    pub default_requirement: String,
}

/// Builds the gateway router.
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/runs", post(run_handler))
        .route("/refresh", post(refresh_handler))
        .with_state(state)
}

/// Body of `POST /runs`.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    /// Requirement text handed to the planning agent.
    pub requirement: String,
}

/// Reply for a completed orchestration run.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    /// Id of the run that was executed.
    pub run_id: Uuid,
    /// Per-task status lines in plan order.
    pub tasks: Vec<TaskSummary>,
}

/// Reply for `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Id of the most recent run, if any.
    pub run_id: Option<Uuid>,
    /// Per-task status lines in plan order.
    pub tasks: Vec<TaskSummary>,
}

struct ApiError(OverseerError);

impl From<OverseerError> for ApiError {
    fn from(err: OverseerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Orchestration request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let engine = state.orchestrator.lock().await;
    Json(StatusResponse {
        run_id: engine.run_id(),
        tasks: engine.summary(),
    })
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>, ApiError> {
    execute(&state, &request.requirement).await
}

async fn refresh_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RunResponse>, ApiError> {
    info!("Manual refresh triggered");
    let requirement = state.default_requirement.clone();
    execute(&state, &requirement).await
}

async fn execute(state: &AppState, requirement: &str) -> Result<Json<RunResponse>, ApiError> {
    let mut engine = state.orchestrator.lock().await;
    engine.bootstrap(requirement).await?;
    engine.run().await?;
    Ok(Json(RunResponse {
        run_id: engine.run_id().unwrap_or_default(),
        tasks: engine.summary(),
    }))
}
