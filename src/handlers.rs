use crate::errors::AppError;
use crate::models::{Habit, Snapshot};
use crate::state::AppState;
use crate::ui::render_index;
use crate::update::Action;
use axum::{Json, extract::State, response::Html};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshot().await;
    Html(render_index(&snapshot))
}

pub async fn get_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    Json(state.habits.to_vec())
}

pub async fn get_state(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.snapshot().await)
}

pub async fn post_action(
    State(state): State<AppState>,
    Json(action): Json<Action>,
) -> Result<Json<Snapshot>, AppError> {
    state.act(action).await?;
    Ok(Json(state.snapshot().await))
}
