//! HTTP routes.

mod characters;
mod game;

use axum::routing::{get, post};
use axum::{Json, Router};
use dnd_engine::CharacterId;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

/// All routes, relative to wherever they are mounted.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/characters",
            post(characters::create_character).get(characters::list_characters),
        )
        .route(
            "/characters/{id}",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .route("/game/start/{id}", post(game::start_game))
        .route("/game/action/{id}", post(game::take_action))
        .route("/game/end/{id}", post(game::end_game))
        .route("/game/state/{id}", get(game::game_state))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) fn parse_id(raw: &str) -> Result<CharacterId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid character ID".to_string()))
}
