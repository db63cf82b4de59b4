//! The game service: session lifecycle for every character.
//!
//! ```text
//! Absent --start--> Active --act--> Active
//!                   Active --start--> Active (reset)
//!                   Active --end--> Absent
//! ```
//!
//! Operations on one character are serialised through a per-character lock;
//! different characters proceed independently. A lock entry lives only while
//! someone holds or waits on it. A session is only written
//! back after the storyteller has answered, so a failed call never leaves a
//! half-applied turn behind.

use crate::character::CharacterId;
use crate::checks::classify;
use crate::config::StorytellerConfig;
use crate::error::{GameError, ValidationError};
use crate::prompts::{action_prompt, opening_prompt};
use crate::session::{EntryKind, Session};
use crate::store::{CharacterStore, SessionStore};
use crate::storyteller::{StoryRequest, Storyteller, StorytellerError};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

impl From<StorytellerError> for GameError {
    fn from(e: StorytellerError) -> Self {
        match e {
            StorytellerError::Timeout => GameError::UpstreamTimeout,
            StorytellerError::Upstream(msg) => GameError::Upstream(msg),
        }
    }
}

/// Orchestrates characters, sessions and the storyteller.
pub struct GameService {
    characters: Arc<dyn CharacterStore>,
    sessions: Arc<dyn SessionStore>,
    storyteller: Arc<dyn Storyteller>,
    config: StorytellerConfig,
    locks: DashMap<CharacterId, Arc<Mutex<()>>>,
}

/// Holds one character's turn lock and drops the table entry on release
/// once no other caller holds or waits on it.
struct TurnGuard<'a> {
    locks: &'a DashMap<CharacterId, Arc<Mutex<()>>>,
    character_id: CharacterId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex (and its Arc) before checking the count.
        drop(self.guard.take());
        // Runs under the shard lock, so it cannot race `entry().or_default()`.
        self.locks
            .remove_if(&self.character_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl GameService {
    pub fn new(
        characters: Arc<dyn CharacterStore>,
        sessions: Arc<dyn SessionStore>,
        storyteller: Arc<dyn Storyteller>,
    ) -> Self {
        Self {
            characters,
            sessions,
            storyteller,
            config: StorytellerConfig::default(),
            locks: DashMap::new(),
        }
    }

    pub fn with_config(mut self, config: StorytellerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn characters(&self) -> &Arc<dyn CharacterStore> {
        &self.characters
    }

    async fn lock(&self, character_id: CharacterId) -> TurnGuard<'_> {
        let lock = self.locks.entry(character_id).or_default().clone();
        TurnGuard {
            locks: &self.locks,
            character_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Start a session, or restart the existing one from scratch.
    ///
    /// Makes exactly one storyteller call.
    pub async fn start(&self, character_id: CharacterId) -> Result<Session, GameError> {
        let _guard = self.lock(character_id).await;

        let character = self.characters.find(character_id).await?;
        let mut session = match self.sessions.find(character_id).await? {
            Some(mut existing) => {
                tracing::info!(%character_id, "restarting game session");
                existing.reset(character);
                existing
            }
            None => {
                tracing::info!(%character_id, "starting game session");
                Session::new(character)
            }
        };

        let scene = self.narrate(opening_prompt(&session.character)).await?;
        session.record_scene(scene);

        Ok(self.sessions.save(session).await?)
    }

    /// Apply a player action to the active session.
    pub async fn act(&self, character_id: CharacterId, action: &str) -> Result<Session, GameError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(ValidationError::EmptyAction.into());
        }

        let _guard = self.lock(character_id).await;

        let mut session = self
            .sessions
            .find(character_id)
            .await?
            .ok_or(GameError::NoActiveGame(character_id))?;

        session.record(EntryKind::PlayerAction, action);

        let check = classify(action, &session.character.stats);
        match &check {
            Some(check) => {
                tracing::debug!(%character_id, ability = check.ability.key(), dc = check.dc, "action calls for a check");
                session.record(EntryKind::AbilityCheck, check.to_string());
            }
            None => tracing::debug!(%character_id, "action needs no check"),
        }

        let prompt = action_prompt(
            &session.character,
            session.current_scene.as_deref(),
            action,
            check.as_ref(),
        );
        let scene = self.narrate(prompt).await?;

        session.record_scene(scene);
        session.last_action = Some(action.to_string());

        Ok(self.sessions.save(session).await?)
    }

    /// End the session. Ending a session that does not exist is a no-op.
    pub async fn end(&self, character_id: CharacterId) -> Result<(), GameError> {
        let _guard = self.lock(character_id).await;
        self.sessions.delete(character_id).await?;
        tracing::info!(%character_id, "game session ended");
        Ok(())
    }

    /// Current snapshot of the session.
    pub async fn state(&self, character_id: CharacterId) -> Result<Session, GameError> {
        self.sessions
            .find(character_id)
            .await?
            .ok_or(GameError::NoActiveGame(character_id))
    }

    async fn narrate(&self, prompt: String) -> Result<String, GameError> {
        let request = StoryRequest {
            system: self.config.system_prompt.clone(),
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        Ok(self.storyteller.complete(&request).await?)
    }
}
