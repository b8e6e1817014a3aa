//! JSON file storage
//!
//! Directory structure per user:
//! ```text
//! users/{user-id}/
//! ├── profiles.json        # Profile store
//! └── cards/
//!     └── {card-id}.json   # One file per card
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use super::{Result, ReviewRepository};
use crate::scheduling::{Card, ProfileStore};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Card {card_id} was changed elsewhere (expected revision {expected}, found {found})")]
    RevisionConflict { card_id: Uuid, expected: u64, found: u64 },

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Data directory not found")]
    DataDirNotFound,
}

/// File-backed [`ReviewRepository`]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("mnemo"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the directory for a user, rejecting ids that could escape it
    fn user_dir(&self, user_id: &str) -> Result<PathBuf> {
        let valid = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidUserId(user_id.to_string()));
        }
        Ok(self.base_path.join("users").join(user_id))
    }

    fn cards_dir(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.user_dir(user_id)?.join("cards"))
    }

    fn card_path(&self, user_id: &str, card_id: Uuid) -> Result<PathBuf> {
        Ok(self.cards_dir(user_id)?.join(format!("{}.json", card_id)))
    }

    fn profiles_path(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.user_dir(user_id)?.join("profiles.json"))
    }

    /// Initialize storage directories for a user
    pub fn init(&self, user_id: &str) -> Result<()> {
        fs::create_dir_all(self.cards_dir(user_id)?)?;
        Ok(())
    }

    /// Write via a temporary file so readers never see half a document
    fn write_atomic(path: &Path, json: String) -> Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn read_card(path: &Path) -> Result<Card> {
        let content = fs::read_to_string(path)?;
        let card: Card = serde_json::from_str(&content)?;
        Ok(card)
    }
}

impl ReviewRepository for FileStorage {
    fn load_cards(&self, user_id: &str) -> Result<Vec<Card>> {
        let cards_dir = self.cards_dir(user_id)?;
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                match Self::read_card(&path) {
                    Ok(card) => cards.push(card),
                    Err(e) => {
                        log::warn!("Failed to load card from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Soonest first, retired last
        cards.sort_by(|a, b| {
            a.next_review_date
                .cmp(&b.next_review_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(cards)
    }

    fn get_card(&self, user_id: &str, card_id: Uuid) -> Result<Card> {
        let path = self.card_path(user_id, card_id)?;
        if !path.exists() {
            return Err(StorageError::CardNotFound(card_id));
        }
        Self::read_card(&path)
    }

    fn load_profile_store(&self, user_id: &str) -> Result<ProfileStore> {
        let path = self.profiles_path(user_id)?;
        if !path.exists() {
            log::info!("No saved profiles for user {}, using built-in profiles", user_id);
            return Ok(ProfileStore::default());
        }

        let content = fs::read_to_string(&path)?;
        let store: ProfileStore = serde_json::from_str(&content)?;
        Ok(store)
    }

    fn save_card(&self, user_id: &str, card: &Card) -> Result<Card> {
        self.init(user_id)?;
        let path = self.card_path(user_id, card.id)?;

        if path.exists() {
            let stored = Self::read_card(&path)?;
            if stored.revision != card.revision {
                return Err(StorageError::RevisionConflict {
                    card_id: card.id,
                    expected: card.revision,
                    found: stored.revision,
                });
            }
        } else if card.revision != 0 {
            // Previously saved, since deleted elsewhere
            return Err(StorageError::CardNotFound(card.id));
        }

        let saved = Card {
            revision: card.revision + 1,
            ..card.clone()
        };
        Self::write_atomic(&path, serde_json::to_string_pretty(&saved)?)?;
        Ok(saved)
    }

    fn save_profile_store(&self, user_id: &str, store: &ProfileStore) -> Result<()> {
        fs::create_dir_all(self.user_dir(user_id)?)?;
        let path = self.profiles_path(user_id)?;
        Self::write_atomic(&path, serde_json::to_string_pretty(store)?)
    }

    fn delete_card(&self, user_id: &str, card_id: Uuid) -> Result<()> {
        let path = self.card_path(user_id, card_id)?;
        if !path.exists() {
            return Err(StorageError::CardNotFound(card_id));
        }
        fs::remove_file(&path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::{create_card, DueDate, Profile};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
    }

    fn new_card(content: &str) -> Card {
        create_card(content.to_string(), None, &ProfileStore::default(), today())
    }

    #[test]
    fn test_save_and_load_card() {
        let (storage, _temp) = create_test_storage();
        let card = new_card("first");

        let saved = storage.save_card("alice", &card).unwrap();
        assert_eq!(saved.revision, 1);

        let loaded = storage.get_card("alice", card.id).unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(storage.load_cards("alice").unwrap(), vec![saved]);
        assert!(storage.load_cards("bob").unwrap().is_empty());
    }

    #[test]
    fn test_stale_revision_is_rejected() {
        let (storage, _temp) = create_test_storage();
        let card = new_card("q");
        let first = storage.save_card("alice", &card).unwrap();

        // Two sessions start from the same revision
        let mut session_a = first.clone();
        let mut session_b = first.clone();
        session_a.content = "edited in a".to_string();
        session_b.content = "edited in b".to_string();

        storage.save_card("alice", &session_a).unwrap();
        let err = storage.save_card("alice", &session_b).unwrap_err();
        assert!(matches!(
            err,
            StorageError::RevisionConflict { expected: 1, found: 2, .. }
        ));
        assert_eq!(storage.get_card("alice", card.id).unwrap().content, "edited in a");
    }

    #[test]
    fn test_delete_card() {
        let (storage, _temp) = create_test_storage();
        let card = new_card("q");
        let saved = storage.save_card("alice", &card).unwrap();

        storage.delete_card("alice", card.id).unwrap();
        assert!(matches!(storage.get_card("alice", card.id), Err(StorageError::CardNotFound(_))));
        assert!(matches!(storage.delete_card("alice", card.id), Err(StorageError::CardNotFound(_))));
        assert!(matches!(storage.save_card("alice", &saved), Err(StorageError::CardNotFound(_))));
    }

    #[test]
    fn test_retired_card_round_trips() {
        let (storage, _temp) = create_test_storage();
        let mut card = new_card("q");
        card.next_review_date = DueDate::Retired;
        card.is_graduated = true;

        storage.save_card("alice", &card).unwrap();
        let loaded = storage.get_card("alice", card.id).unwrap();
        assert_eq!(loaded.next_review_date, DueDate::Retired);
    }

    #[test]
    fn test_profile_store_defaults_then_persists() {
        let (storage, _temp) = create_test_storage();
        assert_eq!(storage.load_profile_store("alice").unwrap(), ProfileStore::default());

        let store = ProfileStore::new(vec![Profile::new("mine", "Mine", vec![2, 4])], "mine").unwrap();
        storage.save_profile_store("alice", &store).unwrap();
        assert_eq!(storage.load_profile_store("alice").unwrap(), store);
    }

    #[test]
    fn test_unreadable_card_is_skipped() {
        let (storage, temp) = create_test_storage();
        storage.save_card("alice", &new_card("good")).unwrap();
        let broken = temp.path().join("users/alice/cards/broken.json");
        fs::write(broken, "{not json").unwrap();

        let cards = storage.load_cards("alice").unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].content, "good");
    }

    #[test]
    fn test_user_id_cannot_escape_data_dir() {
        let (storage, _temp) = create_test_storage();
        assert!(matches!(
            storage.load_cards("../etc"),
            Err(StorageError::InvalidUserId(_))
        ));
        assert!(matches!(storage.load_cards(""), Err(StorageError::InvalidUserId(_))));
    }
}
