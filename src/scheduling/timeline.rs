//! Optimistic timeline projection
//!
//! Projects the dates a card would come due if every future review were
//! answered correctly. This is a forecast for calendar display, not a
//! prediction: a single wrong answer or a late review changes everything
//! after it. Nothing here mutates a card.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::models::Card;
use super::models::Profile;
use super::profiles::ProfileStore;

/// Bounds on a projection. Maintenance cadences repeat forever, so both
/// limits are always enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionOptions {
    /// Dates after `today + horizon_days` are never returned
    pub horizon_days: u32,
    /// Maximum number of simulated reviews
    pub max_steps: usize,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            horizon_days: 730,
            max_steps: 50,
        }
    }
}

/// Future due dates of `card`, assuming every review from here on is correct
pub fn project(
    card: &Card,
    profile: &Profile,
    today: NaiveDate,
    options: ProjectionOptions,
) -> BTreeSet<NaiveDate> {
    let mut dates = BTreeSet::new();

    // Retired cards have no future occurrences
    let Some(start) = card.next_review_date.date() else {
        return dates;
    };

    let horizon = today
        .checked_add_days(Days::new(u64::from(options.horizon_days)))
        .unwrap_or(NaiveDate::MAX);
    if start > horizon {
        return dates;
    }
    dates.insert(start);

    let mut cursor = start;
    let mut streak = card.streak;
    let mut graduated = card.is_graduated;

    for _ in 0..options.max_steps {
        if !graduated {
            streak = streak.saturating_add(1);
            graduated = profile.graduates_at(streak);
        }

        let step = if graduated {
            if profile.retires_on_graduation() {
                break;
            }
            profile.graduation_interval
        } else {
            profile.interval_at(streak)
        };

        cursor = match cursor.checked_add_days(Days::new(u64::from(step))) {
            Some(next) if next <= horizon => next,
            _ => break,
        };
        dates.insert(cursor);
    }

    dates
}

/// Number of projected occurrences per date across `cards`
pub fn forecast(
    cards: &[Card],
    store: &ProfileStore,
    today: NaiveDate,
    options: ProjectionOptions,
) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for card in cards {
        let profile = store.resolve(&card.profile_id);
        for date in project(card, profile, today, options) {
            *counts.entry(date).or_insert(0) += 1;
        }
    }
    counts
}
