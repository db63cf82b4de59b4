//! Character and session storage.
//!
//! Both stores are traits so the game service never knows where state
//! lives. The in-memory versions here back tests and single-process
//! deployments; [`crate::persist::FileCharacterStore`] keeps characters on disk.

use crate::character::{Character, CharacterId, CharacterPatch};
use crate::error::{GameError, ValidationError};
use crate::session::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

impl From<StoreError> for GameError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => GameError::NotFound(id),
            StoreError::Validation(v) => GameError::Validation(v),
            other => GameError::Store(other.to_string()),
        }
    }
}

#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn find(&self, id: CharacterId) -> Result<Character, StoreError>;

    /// All characters, oldest first.
    async fn list(&self) -> Result<Vec<Character>, StoreError>;

    /// Insert or replace. The character is validated first.
    async fn save(&self, character: Character) -> Result<Character, StoreError>;

    /// Apply a full or partial update and return the stored result.
    async fn update(&self, id: CharacterId, patch: CharacterPatch)
        -> Result<Character, StoreError>;

    async fn delete(&self, id: CharacterId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find(&self, character_id: CharacterId) -> Result<Option<Session>, StoreError>;

    async fn save(&self, session: Session) -> Result<Session, StoreError>;

    /// Remove the session if there is one. Never fails for a missing id.
    async fn delete(&self, character_id: CharacterId) -> Result<(), StoreError>;
}

/// Sort a set of characters into creation order.
pub(crate) fn sorted_by_creation(mut characters: Vec<Character>) -> Vec<Character> {
    characters.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.0.cmp(&b.id.0))
    });
    characters
}

/// Characters held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCharacterStore {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl MemoryCharacterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterStore for MemoryCharacterStore {
    async fn find(&self, id: CharacterId) -> Result<Character, StoreError> {
        self.characters
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Character>, StoreError> {
        let characters = self.characters.read().await.values().cloned().collect();
        Ok(sorted_by_creation(characters))
    }

    async fn save(&self, character: Character) -> Result<Character, StoreError> {
        character.validate()?;
        self.characters
            .write()
            .await
            .insert(character.id, character.clone());
        Ok(character)
    }

    async fn update(
        &self,
        id: CharacterId,
        patch: CharacterPatch,
    ) -> Result<Character, StoreError> {
        let mut characters = self.characters.write().await;
        let current = characters.get(&id).ok_or(StoreError::NotFound(id))?;
        let updated = current.apply(patch)?;
        characters.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: CharacterId) -> Result<(), StoreError> {
        self.characters
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

/// Sessions held in process memory, keyed by character.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<CharacterId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find(&self, character_id: CharacterId) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(&character_id).cloned())
    }

    async fn save(&self, session: Session) -> Result<Session, StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.character_id, session.clone());
        Ok(session)
    }

    async fn delete(&self, character_id: CharacterId) -> Result<(), StoreError> {
        self.sessions.write().await.remove(&character_id);
        Ok(())
    }
}
