use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/habits", get(handlers::get_habits))
        .route("/api/state", get(handlers::get_state))
        .route("/api/actions", post(handlers::post_action))
        .with_state(state)
}
