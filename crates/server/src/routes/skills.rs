use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::skill::{CreateSkill, Skill, UpdateSkill};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_skill_middleware};

pub async fn get_skills(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Skill>>>, ApiError> {
    let skills = Skill::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(skills)))
}

pub async fn create_skill(
    State(state): State<AppState>,
    Json(payload): Json<CreateSkill>,
) -> Result<ResponseJson<ApiResponse<Skill>>, ApiError> {
    let skill = Skill::create(&state.db().pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(skill)))
}

pub async fn update_skill(
    Extension(existing): Extension<Skill>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateSkill>,
) -> Result<ResponseJson<ApiResponse<Skill>>, ApiError> {
    let skill = Skill::update(&state.db().pool, existing.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(skill)))
}

pub async fn delete_skill(
    Extension(skill): Extension<Skill>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Skill::delete(&state.db().pool, skill.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Skill not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let id_router = Router::new()
        .route("/", put(update_skill).delete(delete_skill))
        .layer(from_fn_with_state(state.clone(), load_skill_middleware));

    let inner = Router::new()
        .route("/", get(get_skills).post(create_skill))
        .nest("/{skill_id}", id_router);

    Router::new().nest("/skills", inner)
}
