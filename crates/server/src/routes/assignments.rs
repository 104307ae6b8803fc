use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::Json as ResponseJson,
    routing::{get, post},
};
use serde::Deserialize;
use services::services::assignment::{AssignmentMatrix, ToggleOutcome};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn get_assignment_matrix(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<AssignmentMatrix>>, ApiError> {
    let matrix = state.assignments().load_matrix(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(matrix)))
}

#[derive(Debug, Deserialize)]
pub struct ToggleAssignmentRequest {
    pub event_id: Uuid,
    pub staff_id: Uuid,
}

pub async fn toggle_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ToggleAssignmentRequest>,
) -> Result<ResponseJson<ApiResponse<ToggleOutcome>>, ApiError> {
    let assigned_by = operator_id(&headers)?;
    let outcome = state
        .assignments()
        .toggle_assignment(
            &state.db().pool,
            payload.event_id,
            payload.staff_id,
            assigned_by,
        )
        .await?;
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

/// The acting operator's id, supplied by the identity layer in front of this
/// service. Audit-only; it never gates the toggle.
fn operator_id(headers: &HeaderMap) -> Result<Option<Uuid>, ApiError> {
    let Some(value) = headers.get("x-operator-id") else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .map(Some)
        .ok_or(ApiError::BadRequest(
            "Invalid X-Operator-Id header".to_string(),
        ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assignments", get(get_assignment_matrix))
        .route("/assignments/toggle", post(toggle_assignment))
}
