use axum::{Router, routing::get};

use crate::{AppState, routes};

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::skill_types::router(&state))
        .merge(routes::skills::router(&state))
        .merge(routes::staff::router(&state))
        .merge(routes::events::router(&state))
        .merge(routes::survey_requests::router())
        .merge(routes::surveys::router())
        .merge(routes::assignments::router());

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .with_state(state)
}
