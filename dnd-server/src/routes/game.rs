//! Game session routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use dnd_engine::{Session, ValidationError};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_id;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub action: Option<String>,
}

pub async fn start_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.game.start(id).await?))
}

pub async fn take_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let id = parse_id(&id)?;
    let action = payload?
        .0
        .action
        .ok_or(ApiError::from(ValidationError::EmptyAction))?;

    let session = state
        .game
        .act(id, &action)
        .await
        .map_err(ApiError::for_action)?;
    Ok(Json(session))
}

pub async fn end_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state.game.end(id).await?;
    Ok(Json(json!({ "message": "Game ended successfully" })))
}

pub async fn game_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.game.state(id).await?))
}
