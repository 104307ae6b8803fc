use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::skill_type::{CreateSkillType, SkillType, UpdateSkillType};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_skill_type_middleware};

pub async fn get_skill_types(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<SkillType>>>, ApiError> {
    let skill_types = SkillType::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(skill_types)))
}

pub async fn create_skill_type(
    State(state): State<AppState>,
    Json(payload): Json<CreateSkillType>,
) -> Result<ResponseJson<ApiResponse<SkillType>>, ApiError> {
    let skill_type = SkillType::create(&state.db().pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(skill_type)))
}

pub async fn update_skill_type(
    Extension(existing): Extension<SkillType>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateSkillType>,
) -> Result<ResponseJson<ApiResponse<SkillType>>, ApiError> {
    let skill_type = SkillType::update(&state.db().pool, existing.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(skill_type)))
}

pub async fn delete_skill_type(
    Extension(skill_type): Extension<SkillType>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = SkillType::delete(&state.db().pool, skill_type.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Skill type not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let id_router = Router::new()
        .route("/", put(update_skill_type).delete(delete_skill_type))
        .layer(from_fn_with_state(
            state.clone(),
            load_skill_type_middleware,
        ));

    let inner = Router::new()
        .route("/", get(get_skill_types).post(create_skill_type))
        .nest("/{skill_type_id}", id_router);

    Router::new().nest("/skill-types", inner)
}
