//! Play sessions.
//!
//! A session is the narrative state threaded through successive scenes for
//! one character. It carries its own copy of the character, taken when the
//! session starts, so later edits to the character sheet do not leak into a
//! game in progress.

use crate::character::{Character, CharacterId, InventoryItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Scene,
    PlayerAction,
    AbilityCheck,
}

/// One entry in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Session state for one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub character_id: CharacterId,

    /// Point-in-time copy of the character.
    pub character: Character,

    pub current_scene: Option<String>,

    /// Copied from the character at start; may diverge afterwards.
    pub inventory: Vec<InventoryItem>,

    /// Append-only, oldest first.
    pub history: Vec<HistoryEntry>,

    pub last_action: Option<String>,

    pub started_at: DateTime<Utc>,
}

impl Session {
    /// A fresh session with no scene and empty history.
    pub fn new(character: Character) -> Self {
        Self {
            character_id: character.id,
            inventory: character.inventory.clone(),
            character,
            current_scene: None,
            history: Vec::new(),
            last_action: None,
            started_at: Utc::now(),
        }
    }

    /// Restart against a new snapshot of the character.
    pub fn reset(&mut self, character: Character) {
        *self = Self::new(character);
    }

    /// Append a history entry stamped now.
    pub fn record(&mut self, kind: EntryKind, content: impl Into<String>) {
        self.history.push(HistoryEntry {
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    /// Append a narrated scene and make it the current one.
    pub fn record_scene(&mut self, scene: String) {
        self.record(EntryKind::Scene, scene.clone());
        self.current_scene = Some(scene);
    }

    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().filter(move |e| e.kind == kind)
    }
}
