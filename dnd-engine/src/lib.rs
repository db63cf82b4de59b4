//! D&D 5e character sheets and AI-narrated game sessions.
//!
//! This crate provides:
//! - Character records with derived hit points, armor class and modifiers
//! - Classification of free-text actions into ability checks
//! - Prompt templates for an AI Dungeon Master
//! - A per-character session state machine driven by a pluggable storyteller
//!
//! # Quick Start
//!
//! ```ignore
//! use dnd_engine::{ClaudeStoryteller, GameService, MemoryCharacterStore, MemorySessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let characters = Arc::new(MemoryCharacterStore::new());
//!     let service = GameService::new(
//!         characters.clone(),
//!         Arc::new(MemorySessionStore::new()),
//!         Arc::new(ClaudeStoryteller::from_env()?),
//!     );
//!
//!     let id = /* a saved character's id */;
//!     let session = service.start(id).await?;
//!     println!("{}", session.current_scene.unwrap_or_default());
//!
//!     let session = service.act(id, "I try to climb the wall").await?;
//!     println!("{}", session.current_scene.unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod character;
pub mod checks;
pub mod class_data;
pub mod config;
pub mod error;
pub mod game;
pub mod persist;
pub mod prompts;
pub mod session;
pub mod store;
pub mod storyteller;
pub mod testing;

pub use character::{
    Ability, AbilityScores, Armor, ArmorType, Character, CharacterClass, CharacterId,
    CharacterPatch, CharacterSheet, HitPoints, InventoryItem, NewCharacter, RaceType,
};
pub use checks::{classify, AbilityCheck};
pub use config::{RetryConfig, StorytellerConfig};
pub use error::{GameError, ValidationError};
pub use game::GameService;
pub use persist::FileCharacterStore;
pub use session::{EntryKind, HistoryEntry, Session};
pub use store::{CharacterStore, MemoryCharacterStore, MemorySessionStore, SessionStore, StoreError};
pub use storyteller::{
    ClaudeStoryteller, ResilientStoryteller, StoryRequest, Storyteller, StorytellerError,
};
pub use testing::{sample_character, ScriptedStoryteller};
