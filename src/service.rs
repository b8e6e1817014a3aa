//! Orchestration between the scheduling engine and storage
//!
//! [`ReviewService`] is what front ends call. Each operation loads the
//! user's profile store, runs the pure engine with an explicit `today`,
//! and writes back one card per change.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::scheduling::{
    self, Card, DueDate, HistoryOutcome, Profile, ProfileError, ProfileStore, ReviewOutcome, ReviewStats,
};
use crate::storage::{ReviewRepository, StorageError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("Cannot snooze for {days} days (at most {max})")]
    SnoozeOutOfRange { days: u32, max: u32 },
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Everything a client needs to work offline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub cards: Vec<Card>,
    pub profiles: ProfileStore,
}

/// Review operations for a single user
pub struct ReviewService<R> {
    repo: R,
    user_id: String,
    config: SchedulerConfig,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(repo: R, user_id: impl Into<String>, config: SchedulerConfig) -> Self {
        Self {
            repo,
            user_id: user_id.into(),
            config,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    // ==================== Loading ====================

    pub fn profiles(&self) -> Result<ProfileStore> {
        Ok(self.repo.load_profile_store(&self.user_id)?)
    }

    pub fn cards(&self) -> Result<Vec<Card>> {
        Ok(self.repo.load_cards(&self.user_id)?)
    }

    pub fn card(&self, card_id: Uuid) -> Result<Card> {
        Ok(self.repo.get_card(&self.user_id, card_id)?)
    }

    /// All cards and profiles, e.g. for export
    pub fn sync(&self) -> Result<SyncSnapshot> {
        Ok(SyncSnapshot {
            cards: self.cards()?,
            profiles: self.profiles()?,
        })
    }

    // ==================== Card Operations ====================

    pub fn create_card(&self, content: String, profile_id: Option<&str>, today: NaiveDate) -> Result<Card> {
        let store = self.profiles()?;
        if let Some(id) = profile_id.filter(|id| !store.contains(id)) {
            log::warn!("Unknown profile '{}', using default '{}'", id, store.default_id());
        }

        let card = scheduling::create_card(content, profile_id, &store, today);
        let saved = self.repo.save_card(&self.user_id, &card)?;
        log::info!(
            "Created card {} on profile '{}', due {}",
            saved.id,
            saved.profile_id,
            saved.next_review_date
        );
        Ok(saved)
    }

    /// Record a review and reschedule the card
    pub fn review_card(&self, card_id: Uuid, outcome: ReviewOutcome, today: NaiveDate) -> Result<Card> {
        let store = self.profiles()?;
        let card = self.card(card_id)?;
        let profile = store.resolve(&card.profile_id);

        let reviewed = scheduling::review(&card, profile, outcome, today);
        let saved = self.repo.save_card(&self.user_id, &reviewed)?;
        log::info!(
            "Reviewed card {} ({:?}): level {} -> {}, next {}",
            card_id,
            outcome,
            card.streak,
            saved.streak,
            saved.next_review_date
        );
        Ok(saved)
    }

    /// Push a card out by `days`, or the configured default
    pub fn snooze_card(&self, card_id: Uuid, days: Option<u32>, today: NaiveDate) -> Result<Card> {
        let days = days.unwrap_or(self.config.default_snooze_days);
        let max = self.config.max_interval_days;
        if days > max || DueDate::checked_after(today, days).is_none() {
            return Err(ServiceError::SnoozeOutOfRange { days, max });
        }
        let card = self.card(card_id)?;
        let saved = self
            .repo
            .save_card(&self.user_id, &scheduling::snooze(&card, days, today))?;
        log::info!("Snoozed card {} until {}", card_id, saved.next_review_date);
        Ok(saved)
    }

    /// Change content and/or profile; a new profile must exist
    pub fn edit_card(
        &self,
        card_id: Uuid,
        content: Option<String>,
        profile_id: Option<&str>,
        today: NaiveDate,
    ) -> Result<Card> {
        let store = self.profiles()?;
        if let Some(id) = profile_id {
            if !store.contains(id) {
                return Err(ProfileError::NotFound(id.to_string()).into());
            }
        }

        let card = self.card(card_id)?;
        let edited = scheduling::edit_card(&card, content, profile_id, &store, today);
        if edited == card {
            return Ok(card);
        }
        Ok(self.repo.save_card(&self.user_id, &edited)?)
    }

    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        self.repo.delete_card(&self.user_id, card_id)?;
        log::info!("Deleted card {}", card_id);
        Ok(())
    }

    // ==================== Views ====================

    /// Cards due on or before `today`, oldest first
    pub fn due_cards(&self, today: NaiveDate) -> Result<Vec<Card>> {
        let mut due: Vec<Card> = self
            .cards()?
            .into_iter()
            .filter(|card| card.is_due(today))
            .collect();
        due.sort_by(|a, b| a.next_review_date.cmp(&b.next_review_date));
        Ok(due)
    }

    /// Optimistic future due dates of one card
    pub fn forecast_card(&self, card_id: Uuid, today: NaiveDate) -> Result<BTreeSet<NaiveDate>> {
        let store = self.profiles()?;
        let card = self.card(card_id)?;
        let profile = store.resolve(&card.profile_id);
        Ok(scheduling::project(&card, profile, today, self.config.projection()))
    }

    /// Projected reviews per day across all cards
    pub fn calendar(&self, today: NaiveDate) -> Result<BTreeMap<NaiveDate, usize>> {
        let store = self.profiles()?;
        let cards = self.cards()?;
        Ok(scheduling::forecast(&cards, &store, today, self.config.projection()))
    }

    pub fn stats(&self, today: NaiveDate) -> Result<ReviewStats> {
        Ok(compute_stats(&self.cards()?, today))
    }

    // ==================== Profile Operations ====================

    pub fn add_profile(&self, profile: Profile) -> Result<()> {
        let mut store = self.profiles()?;
        let name = profile.name.clone();
        store.add_profile(profile, self.config.max_interval_days)?;
        self.repo.save_profile_store(&self.user_id, &store)?;
        log::info!("Added profile '{}'", name);
        Ok(())
    }

    /// Replace a profile definition and re-schedule every card on it
    ///
    /// The new store and all migrated cards are computed before anything
    /// is written, so a rejected edit leaves storage untouched. Cards are
    /// saved first and the store last; if any write fails, the cards
    /// already written are put back and the store keeps the old rule, so
    /// the same edit can simply be retried. Returns the cards that changed.
    pub fn update_profile(&self, profile: Profile, today: NaiveDate) -> Result<Vec<Card>> {
        let mut store = self.profiles()?;
        let new = profile.clone();
        let old = store.update_profile(profile, self.config.max_interval_days)?;
        let cards = self.cards()?;
        let changed = scheduling::migrate_profile_edit(&cards, &old, &new, today);

        let saved = self.commit_batch(&cards, &changed, &store)?;

        log::info!(
            "Updated profile '{}', re-scheduled {} of {} cards",
            new.id,
            saved.len(),
            cards.len()
        );
        Ok(saved)
    }

    /// Remove a profile and move its cards onto the default profile
    pub fn remove_profile(&self, profile_id: &str, today: NaiveDate) -> Result<Vec<Card>> {
        let mut store = self.profiles()?;
        let removed = store.remove_profile(profile_id)?;
        let default = store.default_profile();

        let cards = self.cards()?;
        let moved: Vec<Card> = cards
            .iter()
            .filter(|card| card.profile_id == removed.id)
            .map(|card| scheduling::migrate(card, &removed, default, today))
            .collect();

        let saved = self.commit_batch(&cards, &moved, &store)?;

        log::info!(
            "Removed profile '{}', moved {} cards to '{}'",
            removed.id,
            saved.len(),
            store.default_id()
        );
        Ok(saved)
    }

    /// Save `changed`, then `store`, undoing the card writes on failure
    fn commit_batch(&self, loaded: &[Card], changed: &[Card], store: &ProfileStore) -> Result<Vec<Card>> {
        let mut saved = Vec::with_capacity(changed.len());
        for card in changed {
            match self.repo.save_card(&self.user_id, card) {
                Ok(card) => saved.push(card),
                Err(e) => {
                    self.restore(loaded, &saved);
                    return Err(e.into());
                }
            }
        }

        if let Err(e) = self.repo.save_profile_store(&self.user_id, store) {
            self.restore(loaded, &saved);
            return Err(e.into());
        }
        Ok(saved)
    }

    /// Write back the loaded state of each card in `written`
    fn restore(&self, loaded: &[Card], written: &[Card]) {
        for card in written {
            let Some(original) = loaded.iter().find(|c| c.id == card.id) else {
                continue;
            };
            let restored = Card {
                revision: card.revision,
                ..original.clone()
            };
            match self.repo.save_card(&self.user_id, &restored) {
                Ok(_) => log::warn!("Rolled back card {} after a failed batch", card.id),
                Err(e) => log::error!("Failed to roll back card {}: {}", card.id, e),
            }
        }
    }

    pub fn set_default_profile(&self, profile_id: &str) -> Result<()> {
        let mut store = self.profiles()?;
        store.set_default(profile_id)?;
        self.repo.save_profile_store(&self.user_id, &store)?;
        log::info!("Default profile is now '{}'", profile_id);
        Ok(())
    }
}

/// Summarise a set of cards as of `today`
pub fn compute_stats(cards: &[Card], today: NaiveDate) -> ReviewStats {
    let mut stats = ReviewStats {
        total_cards: cards.len(),
        ..Default::default()
    };

    for card in cards {
        if card.is_due(today) {
            stats.due_cards += 1;
        }
        if card.is_graduated {
            stats.graduated_cards += 1;
        }
        if card.next_review_date.is_retired() {
            stats.retired_cards += 1;
        }
        stats.max_streak = stats.max_streak.max(card.streak);

        for entry in card.history.iter().filter(|e| e.date == today) {
            stats.reviews_today += 1;
            if entry.outcome != HistoryOutcome::Wrong {
                stats.correct_today += 1;
            }
        }
    }

    if stats.total_cards > 0 {
        stats.mastery_rate = (stats.graduated_cards * 100 / stats.total_cards) as u32;
    }
    stats
}
