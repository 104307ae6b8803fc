use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::DbErr;
use services::services::{assignment::AssignmentError, survey::SurveyError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Survey(#[from] SurveyError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::Survey(err) => match err {
                SurveyError::NotFound => StatusCode::NOT_FOUND,
                SurveyError::AlreadyCompleted => StatusCode::CONFLICT,
                SurveyError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Assignment(err) => match err {
                AssignmentError::NotAvailable => StatusCode::CONFLICT,
                AssignmentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Database(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status_code, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
