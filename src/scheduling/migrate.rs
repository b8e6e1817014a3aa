//! Re-scheduling cards when their rule changes
//!
//! Runs when a profile definition is edited (every card on it) or when a
//! single card is moved to another profile. Pending dates are shifted by
//! the difference between the interval the card was scheduled under and
//! the one the new rule would use. Overdue dates are never rewritten.

use chrono::{Duration, NaiveDate};

use super::models::{Card, DueDate, HistoryOutcome, Profile};

/// Re-project `card` from `old` onto `new`
///
/// `old` is the profile the card's current schedule was computed under.
/// The returned card is assigned to `new`.
pub fn migrate(card: &Card, old: &Profile, new: &Profile, today: NaiveDate) -> Card {
    if old == new && card.profile_id == new.id {
        return card.clone();
    }

    let was_graduated = card.is_graduated;
    let now_graduated = new.graduates_at(card.streak);

    let next_review_date = match card.next_review_date {
        DueDate::On(date) if date < today => {
            log::debug!("Card {} is overdue since {}, keeping its date", card.id, date);
            DueDate::On(date)
        }
        DueDate::On(date) => {
            let before = i64::from(old.scheduled_interval(card.streak, was_graduated));
            let after = i64::from(new.scheduled_interval(card.streak, now_graduated));
            let shifted = date
                .checked_add_signed(Duration::days(after - before))
                .unwrap_or(if after < before { today } else { NaiveDate::MAX });
            // A shorter rule never pushes a pending card into the past
            DueDate::On(shifted.max(today))
        }
        DueDate::Retired if now_graduated && new.retires_on_graduation() => DueDate::Retired,
        DueDate::Retired => DueDate::On(today),
    };

    let mut history = card.history.clone();
    if was_graduated && !now_graduated {
        for entry in history.iter_mut() {
            if entry.outcome == HistoryOutcome::Graduated {
                entry.outcome = HistoryOutcome::Correct;
            }
        }
    }

    Card {
        profile_id: new.id.clone(),
        next_review_date,
        is_graduated: now_graduated,
        history,
        ..card.clone()
    }
}

/// Apply an edit of `old` into `new` to every card assigned to it
///
/// Cards on other profiles are skipped. Only cards that actually changed
/// are returned, so callers can save exactly those.
pub fn migrate_profile_edit(cards: &[Card], old: &Profile, new: &Profile, today: NaiveDate) -> Vec<Card> {
    cards
        .iter()
        .filter(|card| card.profile_id == old.id)
        .filter_map(|card| {
            let migrated = migrate(card, old, new, today);
            (migrated != *card).then_some(migrated)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::models::HistoryEntry;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()
    }

    fn days(n: i64) -> NaiveDate {
        today() + Duration::days(n)
    }

    fn profile(id: &str, intervals: Vec<u32>, graduation_interval: u32) -> Profile {
        let mut profile = Profile::new(id, id.to_uppercase(), intervals);
        profile.graduation_interval = graduation_interval;
        profile
    }

    fn card(profile_id: &str, streak: u32, due: DueDate, is_graduated: bool) -> Card {
        Card {
            id: Uuid::new_v4(),
            content: "q".to_string(),
            profile_id: profile_id.to_string(),
            streak,
            next_review_date: due,
            is_graduated,
            history: Vec::new(),
            revision: 0,
        }
    }

    fn entry(outcome: HistoryOutcome, streak_after: u32) -> HistoryEntry {
        HistoryEntry {
            date: days(-10),
            outcome,
            streak_after,
        }
    }

    #[test]
    fn test_interval_edit_shifts_pending_only() {
        // Scenario E
        let old = profile("p", vec![1, 2, 4], 0);
        let new = profile("p", vec![1, 5, 4], 0);
        let pending = card("p", 1, DueDate::On(days(2)), false);
        let overdue = card("p", 1, DueDate::On(days(-3)), false);

        let moved = migrate(&pending, &old, &new, today());
        assert_eq!(moved.next_review_date, DueDate::On(days(5)));

        let kept = migrate(&overdue, &old, &new, today());
        assert_eq!(kept.next_review_date, overdue.next_review_date);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let old = profile("p", vec![1, 2, 4], 0);
        let new = profile("p", vec![1, 3, 4], 0);
        let due_today = card("p", 1, DueDate::On(today()), false);

        assert_eq!(migrate(&due_today, &old, &new, today()).next_review_date, DueDate::On(days(1)));
    }

    #[test]
    fn test_shorter_interval_never_lands_in_past() {
        let old = profile("p", vec![1, 30], 0);
        let new = profile("p", vec![1, 2], 0);
        let pending = card("p", 1, DueDate::On(days(3)), false);

        assert_eq!(migrate(&pending, &old, &new, today()).next_review_date, DueDate::On(today()));
    }

    #[test]
    fn test_same_profile_is_noop() {
        let profile = profile("p", vec![1, 2, 4], 7);
        let mut graduated = card("p", 3, DueDate::On(days(4)), true);
        graduated.history = vec![entry(HistoryOutcome::Graduated, 3)];

        assert_eq!(migrate(&graduated, &profile, &profile, today()), graduated);
    }

    #[test]
    fn test_ungraduating_relabels_history() {
        let old = profile("p", vec![1, 2], 0);
        let new = profile("p", vec![1, 2, 4], 0);
        let mut retired = card("p", 2, DueDate::Retired, true);
        retired.history = vec![
            entry(HistoryOutcome::Correct, 1),
            entry(HistoryOutcome::Wrong, 0),
            entry(HistoryOutcome::Graduated, 2),
        ];

        let migrated = migrate(&retired, &old, &new, today());

        assert!(!migrated.is_graduated);
        assert_eq!(migrated.next_review_date, DueDate::On(today()));
        let outcomes: Vec<_> = migrated.history.iter().map(|e| e.outcome).collect();
        assert_eq!(
            outcomes,
            vec![HistoryOutcome::Correct, HistoryOutcome::Wrong, HistoryOutcome::Correct]
        );
    }

    #[test]
    fn test_enabling_maintenance_resurfaces_retired_card() {
        let old = profile("p", vec![1, 2], 0);
        let new = profile("p", vec![1, 2], 30);
        let mut retired = card("p", 2, DueDate::Retired, true);
        retired.history = vec![entry(HistoryOutcome::Graduated, 2)];

        let migrated = migrate(&retired, &old, &new, today());

        assert!(migrated.is_graduated);
        assert_eq!(migrated.next_review_date, DueDate::On(today()));
        assert_eq!(migrated.history[0].outcome, HistoryOutcome::Graduated);
    }

    #[test]
    fn test_retired_card_stays_retired() {
        let old = profile("p", vec![1, 2], 0);
        let new = profile("p", vec![3, 6], 0);
        let retired = card("p", 2, DueDate::Retired, true);

        assert_eq!(migrate(&retired, &old, &new, today()).next_review_date, DueDate::Retired);
    }

    #[test]
    fn test_graduated_cadence_change_shifts_by_maintenance_diff() {
        let old = profile("p", vec![1, 2], 30);
        let new = profile("p", vec![1, 2], 10);
        let graduated = card("p", 2, DueDate::On(days(25)), true);

        assert_eq!(migrate(&graduated, &old, &new, today()).next_review_date, DueDate::On(days(5)));
    }

    #[test]
    fn test_reassignment_moves_card() {
        let from = profile("a", vec![1, 2, 4], 0);
        let to = profile("b", vec![3, 6], 0);
        let pending = card("a", 1, DueDate::On(days(2)), false);

        let migrated = migrate(&pending, &from, &to, today());

        assert_eq!(migrated.profile_id, "b");
        assert_eq!(migrated.next_review_date, DueDate::On(days(6)));
        assert!(!migrated.is_graduated);
    }

    #[test]
    fn test_reassignment_graduates_under_shorter_table() {
        let from = profile("a", vec![1, 2, 4, 8], 0);
        let to = profile("b", vec![1, 2], 14);
        let pending = card("a", 2, DueDate::On(days(4)), false);

        let migrated = migrate(&pending, &from, &to, today());

        assert!(migrated.is_graduated);
        assert_eq!(migrated.next_review_date, DueDate::On(days(14)));
    }

    #[test]
    fn test_batch_only_returns_changed_cards_of_profile() {
        let old = profile("p", vec![1, 2, 4], 0);
        let new = profile("p", vec![1, 5, 4], 0);
        let cards = vec![
            card("p", 1, DueDate::On(days(2)), false),
            card("p", 1, DueDate::On(days(-4)), false),
            card("q", 1, DueDate::On(days(2)), false),
        ];

        let changed = migrate_profile_edit(&cards, &old, &new, today());

        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, cards[0].id);
        assert_eq!(changed[0].next_review_date, DueDate::On(days(5)));
    }
}
