//! Persistence boundary for cards and profiles
//!
//! The scheduling engine never touches storage itself. Callers load a
//! user's cards and profile store, run the engine, and write back one card
//! at a time through a [`ReviewRepository`].

mod file_storage;

pub use file_storage::{FileStorage, StorageError};

use uuid::Uuid;

use crate::scheduling::{Card, ProfileStore};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Load and save operations the engine's callers depend on
pub trait ReviewRepository {
    /// All cards owned by `user_id`
    fn load_cards(&self, user_id: &str) -> Result<Vec<Card>>;

    /// A single card owned by `user_id`
    fn get_card(&self, user_id: &str, card_id: Uuid) -> Result<Card>;

    /// The user's profile store, or the built-in one if none was saved
    fn load_profile_store(&self, user_id: &str) -> Result<ProfileStore>;

    /// Save a card, returning it with its new revision
    ///
    /// Fails with [`StorageError::RevisionConflict`] when the stored card
    /// was written by someone else since `card` was loaded.
    fn save_card(&self, user_id: &str, card: &Card) -> Result<Card>;

    fn save_profile_store(&self, user_id: &str, store: &ProfileStore) -> Result<()>;

    fn delete_card(&self, user_id: &str, card_id: Uuid) -> Result<()>;
}
