//! Testing utilities.
//!
//! This module provides tools for deterministic tests without API calls:
//! - `ScriptedStoryteller` returns queued replies and records every request
//! - `sample_character` builds a valid character fixture

use crate::character::{
    AbilityScores, Armor, ArmorType, Character, CharacterClass, CharacterId, InventoryItem,
    RaceType,
};
use crate::storyteller::{StoryRequest, Storyteller, StorytellerError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Reply used once the script runs out.
pub const DEFAULT_REPLY: &str = "The story continues.";

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
    Hang,
}

/// A storyteller that plays back a script.
///
/// Replies are consumed in order; `fail_next` and `hang_next` jump the
/// queue so a test can break the very next call.
#[derive(Debug, Default)]
pub struct ScriptedStoryteller {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<StoryRequest>>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedStoryteller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let storyteller = Self::new();
        for reply in replies {
            storyteller.push_reply(reply);
        }
        storyteller
    }

    /// Queue a reply after everything already scripted.
    pub fn push_reply(&self, reply: impl Into<String>) {
        guard(&self.script).push_back(Scripted::Reply(reply.into()));
    }

    /// Make the next call fail with an upstream error.
    pub fn fail_next(&self, message: impl Into<String>) {
        guard(&self.script).push_front(Scripted::Fail(message.into()));
    }

    /// Make the next call never return.
    pub fn hang_next(&self) {
        guard(&self.script).push_front(Scripted::Hang);
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<StoryRequest> {
        guard(&self.requests).clone()
    }
}

#[async_trait]
impl Storyteller for ScriptedStoryteller {
    async fn complete(&self, request: &StoryRequest) -> Result<String, StorytellerError> {
        guard(&self.requests).push(request.clone());
        let next = guard(&self.script).pop_front();

        match next {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(message)) => Err(StorytellerError::Upstream(message)),
            Some(Scripted::Hang) => {
                std::future::pending::<()>().await;
                Err(StorytellerError::Timeout)
            }
            None => Ok(DEFAULT_REPLY.to_string()),
        }
    }
}

/// A valid level 1 dwarf fighter in chain mail with the standard array.
pub fn sample_character(name: &str) -> Character {
    Character {
        id: CharacterId::new(),
        name: name.to_string(),
        race: RaceType::Dwarf,
        class: CharacterClass::Fighter,
        level: 1,
        stats: AbilityScores::standard_array(),
        armor: Armor::new(ArmorType::Heavy, "Chain Mail"),
        inventory: vec![
            InventoryItem::new("Longsword", 1, "A well-balanced blade"),
            InventoryItem::new("Rations", 5, "Dried meat and hard bread"),
        ],
        created_at: Utc::now(),
    }
}
