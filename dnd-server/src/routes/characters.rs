//! Character CRUD.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use dnd_engine::{Character, CharacterPatch, CharacterSheet, NewCharacter};
use serde_json::{json, Value};

use super::parse_id;
use crate::error::ApiError;
use crate::AppState;

pub async fn create_character(
    State(state): State<AppState>,
    payload: Result<Json<NewCharacter>, JsonRejection>,
) -> Result<(StatusCode, Json<CharacterSheet>), ApiError> {
    let Json(new) = payload?;
    let character = Character::create(new)?;
    let character = state.game.characters().save(character).await?;
    tracing::info!(character_id = %character.id, name = %character.name, "character created");
    Ok((StatusCode::CREATED, Json(character.sheet())))
}

pub async fn list_characters(
    State(state): State<AppState>,
) -> Result<Json<Vec<CharacterSheet>>, ApiError> {
    let characters = state.game.characters().list().await?;
    Ok(Json(characters.into_iter().map(CharacterSheet::from).collect()))
}

pub async fn get_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CharacterSheet>, ApiError> {
    let id = parse_id(&id)?;
    let character = state.game.characters().find(id).await?;
    Ok(Json(character.sheet()))
}

pub async fn update_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CharacterPatch>, JsonRejection>,
) -> Result<Json<CharacterSheet>, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    let character = state.game.characters().update(id, patch).await?;
    Ok(Json(character.sheet()))
}

pub async fn delete_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state.game.characters().delete(id).await?;
    tracing::info!(character_id = %id, "character deleted");
    Ok(Json(json!({ "message": "Character deleted successfully" })))
}
