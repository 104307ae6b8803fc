use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::event::{CreateEvent, Event, UpdateEvent};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_event_middleware};

pub async fn get_events(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Event>>>, ApiError> {
    let events = Event::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(events)))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEvent>,
) -> Result<ResponseJson<ApiResponse<Event>>, ApiError> {
    tracing::debug!("Creating event '{}' on {}", payload.title, payload.date);
    let event = Event::create(&state.db().pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(event)))
}

pub async fn update_event(
    Extension(existing): Extension<Event>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateEvent>,
) -> Result<ResponseJson<ApiResponse<Event>>, ApiError> {
    let event = Event::update(&state.db().pool, existing.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(event)))
}

pub async fn delete_event(
    Extension(event): Extension<Event>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Event::delete(&state.db().pool, event.id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let id_router = Router::new()
        .route("/", put(update_event).delete(delete_event))
        .layer(from_fn_with_state(state.clone(), load_event_middleware));

    let inner = Router::new()
        .route("/", get(get_events).post(create_event))
        .nest("/{event_id}", id_router);

    Router::new().nest("/events", inner)
}
