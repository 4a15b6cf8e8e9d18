//! HTTP route handlers for the plan API.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::state::AppState;
use crate::domain::{Plan, Task, UserInput};
use crate::service::ServiceError;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/process-okr", post(process_okr))
        .route("/initial-plan", get(initial_plan))
        .route("/update-task", post(update_task))
        .route("/user-input", get(user_input))
}

/// Handler failures, rendered as plain-text bodies.
#[derive(Debug)]
enum ApiError {
    InvalidJson,
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON").into_response(),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message).into_response(),
        }
    }
}

/// Decode a JSON body regardless of the request's content type.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "decode_body: rejected request body");
        ApiError::InvalidJson
    })
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProcessOkrRequest {
    weekly_goals: String,
    overall_goals: String,
}

/// POST /api/process-okr - generate and store a new plan.
async fn process_okr(State(state): State<AppState>, body: Bytes) -> Result<Json<Plan>, ApiError> {
    debug!(body_len = body.len(), "process_okr: called");
    let request: ProcessOkrRequest = decode_body(&body)?;
    let plan = state
        .service
        .process_goals(&request.weekly_goals, &request.overall_goals)
        .await?;
    Ok(Json(plan))
}

/// GET /api/initial-plan - the stored plan, or an empty one.
async fn initial_plan(State(state): State<AppState>) -> Json<Plan> {
    debug!("initial_plan: called");
    let plan = state.service.current_plan().await.unwrap_or_else(|e| {
        warn!(error = %e, "initial_plan: load failed, returning empty plan");
        Plan::default()
    });
    Json(plan)
}

/// POST /api/update-task - update one task's content and status.
async fn update_task(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    debug!(body_len = body.len(), "update_task: called");
    let task: Task = decode_body(&body)?;
    state.service.update_task(task).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/user-input - the latest raw input, or an empty one.
async fn user_input(State(state): State<AppState>) -> Json<UserInput> {
    debug!("user_input: called");
    let input = state.service.latest_user_input().await.unwrap_or_else(|e| {
        warn!(error = %e, "user_input: load failed, returning empty input");
        UserInput::default()
    });
    Json(input)
}
