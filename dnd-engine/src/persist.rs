//! File-backed character persistence.
//!
//! Characters live in one pretty-printed JSON document. Every mutation
//! rewrites the whole file through a temp file and a rename, so a crash
//! mid-write leaves the previous version intact.

use crate::character::{Character, CharacterId, CharacterPatch};
use crate::store::{sorted_by_creation, CharacterStore, StoreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// Current save file version.
const SAVE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SavedCharacters {
    version: u32,
    characters: Vec<Character>,
}

/// Character store persisted to a JSON file.
#[derive(Debug)]
pub struct FileCharacterStore {
    path: PathBuf,
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl FileCharacterStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let characters = match fs::read_to_string(&path).await {
            Ok(content) => {
                let saved: SavedCharacters = serde_json::from_str(&content)?;
                if saved.version != SAVE_VERSION {
                    return Err(StoreError::VersionMismatch {
                        expected: SAVE_VERSION,
                        found: saved.version,
                    });
                }
                saved.characters.into_iter().map(|c| (c.id, c)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), count = characters.len(), "opened character store");

        Ok(Self {
            path,
            characters: RwLock::new(characters),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, characters: &HashMap<CharacterId, Character>) -> Result<(), StoreError> {
        let saved = SavedCharacters {
            version: SAVE_VERSION,
            characters: sorted_by_creation(characters.values().cloned().collect()),
        };
        let content = serde_json::to_string_pretty(&saved)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CharacterStore for FileCharacterStore {
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
        let mut characters = self.characters.write().await;
        let mut next = characters.clone();
        next.insert(character.id, character.clone());
        self.flush(&next).await?;
        *characters = next;
        Ok(character)
    }

    async fn update(
        &self,
        id: CharacterId,
        patch: CharacterPatch,
    ) -> Result<Character, StoreError> {
        let mut characters = self.characters.write().await;
        let updated = characters
            .get(&id)
            .ok_or(StoreError::NotFound(id))?
            .apply(patch)?;
        let mut next = characters.clone();
        next.insert(id, updated.clone());
        self.flush(&next).await?;
        *characters = next;
        Ok(updated)
    }

    async fn delete(&self, id: CharacterId) -> Result<(), StoreError> {
        let mut characters = self.characters.write().await;
        if !characters.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        let mut next = characters.clone();
        next.remove(&id);
        self.flush(&next).await?;
        *characters = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_character;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FileCharacterStore::open(dir.path().join("characters.json"))
            .await
            .unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_characters_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("characters.json");

        let store = FileCharacterStore::open(&path).await.unwrap();
        let kept = store.save(sample_character("Kept")).await.unwrap();
        let dropped = store.save(sample_character("Dropped")).await.unwrap();
        store
            .update(
                kept.id,
                CharacterPatch {
                    level: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store.delete(dropped.id).await.unwrap();

        let reopened = FileCharacterStore::open(&path).await.unwrap();
        let characters = reopened.list().await.unwrap();
        assert_eq!(characters.len(), 1);
        assert_eq!(characters[0].id, kept.id);
        assert_eq!(characters[0].level, 3);
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("characters.json");
        fs::write(&path, r#"{"version": 99, "characters": []}"#)
            .await
            .unwrap();

        let result = FileCharacterStore::open(&path).await;
        assert!(matches!(
            result,
            Err(StoreError::VersionMismatch {
                expected: 1,
                found: 99
            })
        ));
    }

    #[tokio::test]
    async fn test_invalid_character_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("characters.json");
        let store = FileCharacterStore::open(&path).await.unwrap();

        let mut character = sample_character("Nobody");
        character.name = String::new();
        assert!(matches!(
            store.save(character).await,
            Err(StoreError::Validation(_))
        ));
        assert!(!path.exists());
    }
}
