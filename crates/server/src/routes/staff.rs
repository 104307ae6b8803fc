use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::staff::{CreateStaff, Staff, UpdateStaff};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_staff_middleware};

pub async fn get_staff(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Staff>>>, ApiError> {
    let members = Staff::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(members)))
}

pub async fn create_staff(
    State(state): State<AppState>,
    Json(payload): Json<CreateStaff>,
) -> Result<ResponseJson<ApiResponse<Staff>>, ApiError> {
    tracing::debug!("Creating staff member '{}'", payload.name);
    let member = Staff::create(&state.db().pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(member)))
}

pub async fn update_staff(
    Extension(existing): Extension<Staff>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateStaff>,
) -> Result<ResponseJson<ApiResponse<Staff>>, ApiError> {
    let member = Staff::update(&state.db().pool, existing.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(member)))
}

pub async fn delete_staff(
    Extension(member): Extension<Staff>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Staff::delete(&state.db().pool, member.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Staff member not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let id_router = Router::new()
        .route("/", put(update_staff).delete(delete_staff))
        .layer(from_fn_with_state(state.clone(), load_staff_middleware));

    let inner = Router::new()
        .route("/", get(get_staff).post(create_staff))
        .nest("/{staff_id}", id_router);

    Router::new().nest("/staff", inner)
}
