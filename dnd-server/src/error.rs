//! HTTP error responses.
//!
//! Every failure leaves the server as `{ "error": "<message>" }`. Upstream
//! and storage failures are logged in full and reported with a generic
//! message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dnd_engine::{GameError, StoreError, ValidationError};
use serde_json::json;

pub const NO_ACTIVE_GAME: &str = "No active game found";
pub const CHARACTER_NOT_FOUND: &str = "Character not found";
pub const UPSTREAM_FAILURE: &str = "Failed to generate AI response";
pub const INTERNAL_FAILURE: &str = "Something went wrong!";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mapping for the action route, where a missing session is the
    /// caller's mistake rather than a missing resource.
    pub fn for_action(e: GameError) -> Self {
        match e {
            GameError::NoActiveGame(_) => ApiError::BadRequest(NO_ACTIVE_GAME.to_string()),
            other => other.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Internal(msg) => msg,
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        match e {
            GameError::Validation(v) => v.into(),
            GameError::NotFound(_) => ApiError::NotFound(CHARACTER_NOT_FOUND.to_string()),
            GameError::NoActiveGame(_) => ApiError::NotFound(NO_ACTIVE_GAME.to_string()),
            GameError::Upstream(msg) => {
                tracing::error!(error = %msg, "storyteller failure");
                ApiError::Internal(UPSTREAM_FAILURE.to_string())
            }
            GameError::UpstreamTimeout => {
                tracing::error!("storyteller timed out");
                ApiError::Internal(UPSTREAM_FAILURE.to_string())
            }
            GameError::Store(msg) => {
                tracing::error!(error = %msg, "storage failure");
                ApiError::Internal(INTERNAL_FAILURE.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        GameError::from(e).into()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnd_engine::CharacterId;

    #[test]
    fn test_status_mapping() {
        let id = CharacterId::new();
        let cases = [
            (GameError::NotFound(id), StatusCode::NOT_FOUND),
            (GameError::NoActiveGame(id), StatusCode::NOT_FOUND),
            (
                GameError::Validation(ValidationError::EmptyAction),
                StatusCode::BAD_REQUEST,
            ),
            (GameError::UpstreamTimeout, StatusCode::INTERNAL_SERVER_ERROR),
            (
                GameError::Store("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_action_without_game_is_bad_request() {
        let err = ApiError::for_action(GameError::NoActiveGame(CharacterId::new()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_detail_is_not_leaked() {
        let err = ApiError::from(GameError::Upstream("api key sk-123 rejected".to_string()));
        match err {
            ApiError::Internal(msg) => assert_eq!(msg, UPSTREAM_FAILURE),
            other => panic!("unexpected {other:?}"),
        }
    }
}
