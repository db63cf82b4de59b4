//! Error types shared across the engine.

use crate::character::{Ability, CharacterId};
use thiserror::Error;

/// A character or action failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Total ability scores ({total}) exceed allowed maximum of {max} for character creation")]
    StatTotal { total: u32, max: u32 },

    #[error("{ability} score {value} is outside the allowed range 3-20")]
    StatOutOfRange { ability: Ability, value: u8 },

    #[error("Level {0} is outside the allowed range 1-20")]
    LevelOutOfRange(u8),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Action is required")]
    EmptyAction,
}

/// Errors from game and character operations.
///
/// The HTTP layer maps each kind onto a status code; nothing here carries
/// transport concerns.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Character not found: {0}")]
    NotFound(CharacterId),

    #[error("No active game found for character {0}")]
    NoActiveGame(CharacterId),

    #[error("Failed to generate AI response: {0}")]
    Upstream(String),

    #[error("AI response timed out")]
    UpstreamTimeout,

    #[error("Storage error: {0}")]
    Store(String),
}

impl GameError {
    /// Whether the caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GameError::UpstreamTimeout)
    }
}
