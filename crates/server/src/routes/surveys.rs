use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Deserialize;
use services::services::survey::SurveyView;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// The token in the path is the respondent's whole credential; there is no
/// other authentication on these routes.
pub async fn get_survey(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ResponseJson<ApiResponse<SurveyView>>, ApiError> {
    let view = state
        .surveys()
        .resolve_by_token(&state.db().pool, &token)
        .await?;
    Ok(ResponseJson(ApiResponse::success(view)))
}

#[derive(Debug, Deserialize)]
pub struct SubmitSurveyRequest {
    pub answers: HashMap<Uuid, bool>,
}

pub async fn submit_survey(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<SubmitSurveyRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state
        .surveys()
        .submit_availability(&state.db().pool, &token, &payload.answers)
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/surveys/{token}", get(get_survey).post(submit_survey))
}
