use axum::{
    Json, Router, extract::State, response::Json as ResponseJson, routing::post,
};
use serde::Deserialize;
use services::services::survey::SurveyBatchSummary;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreateSurveyBatchRequest {
    pub staff_ids: Vec<Uuid>,
    pub event_ids: Vec<Uuid>,
}

pub async fn create_survey_batch(
    State(state): State<AppState>,
    Json(payload): Json<CreateSurveyBatchRequest>,
) -> Result<ResponseJson<ApiResponse<SurveyBatchSummary>>, ApiError> {
    tracing::debug!(
        staff = payload.staff_ids.len(),
        events = payload.event_ids.len(),
        "Creating survey batch"
    );

    let summary = state
        .surveys()
        .create_survey_batch(&state.db().pool, &payload.staff_ids, &payload.event_ids)
        .await?;
    Ok(ResponseJson(ApiResponse::success(summary)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/survey-requests", post(create_survey_batch))
}
