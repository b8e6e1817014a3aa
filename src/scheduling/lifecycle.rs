//! Card creation, snoozing and editing

use chrono::NaiveDate;
use uuid::Uuid;

use super::migrate::migrate;
use super::models::{Card, DueDate, FALLBACK_INTERVAL};
use super::profiles::ProfileStore;

/// Create a new card at level 0
///
/// The card is assigned to `profile_id` when given and known, otherwise to
/// the store's default. It comes due after the profile's first interval,
/// which may be 0 (same day).
pub fn create_card(content: String, profile_id: Option<&str>, store: &ProfileStore, today: NaiveDate) -> Card {
    let profile = match profile_id {
        Some(id) => store.resolve(id),
        None => store.default_profile(),
    };
    let first_interval = match profile.intervals.first() {
        Some(days) => *days,
        None => FALLBACK_INTERVAL,
    };

    Card {
        id: Uuid::new_v4(),
        content,
        profile_id: profile.id.clone(),
        streak: 0,
        next_review_date: DueDate::after(today, first_interval),
        is_graduated: false,
        history: Vec::new(),
        revision: 0,
    }
}

/// Push a card's due date to `days` after `today`
///
/// A manual override: level, graduation and history are left alone.
pub fn snooze(card: &Card, days: u32, today: NaiveDate) -> Card {
    Card {
        next_review_date: DueDate::after(today, days),
        ..card.clone()
    }
}

/// Change a card's content and/or profile
///
/// Moving to a different profile re-schedules the card through the
/// migrator; keeping the same profile only touches the content.
pub fn edit_card(
    card: &Card,
    content: Option<String>,
    profile_id: Option<&str>,
    store: &ProfileStore,
    today: NaiveDate,
) -> Card {
    let mut edited = match profile_id {
        Some(id) if id != card.profile_id => {
            let old = store.resolve(&card.profile_id);
            let new = store.resolve(id);
            migrate(card, old, new, today)
        }
        _ => card.clone(),
    };
    if let Some(content) = content {
        edited.content = content;
    }
    edited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::models::{HistoryEntry, HistoryOutcome, Profile};
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn store() -> ProfileStore {
        let mut slow = Profile::new("slow", "Slow", vec![14, 21, 28]);
        slow.graduation_interval = 60;
        ProfileStore::new(
            vec![Profile::new("fast", "Fast", vec![0, 1, 2]), slow],
            "fast",
        )
        .unwrap()
    }

    #[test]
    fn test_create_uses_first_interval_even_when_zero() {
        let card = create_card("capital of Peru".to_string(), None, &store(), today());

        assert_eq!(card.profile_id, "fast");
        assert_eq!(card.streak, 0);
        assert!(!card.is_graduated);
        assert!(card.history.is_empty());
        assert_eq!(card.next_review_date, DueDate::On(today()));
        assert!(card.is_due(today()));
    }

    #[test]
    fn test_create_with_chosen_or_unknown_profile() {
        let chosen = create_card("x".to_string(), Some("slow"), &store(), today());
        assert_eq!(chosen.profile_id, "slow");
        assert_eq!(chosen.next_review_date, DueDate::On(today() + Duration::days(14)));

        let unknown = create_card("x".to_string(), Some("missing"), &store(), today());
        assert_eq!(unknown.profile_id, "fast");
    }

    #[test]
    fn test_snooze_only_moves_date() {
        let mut card = create_card("x".to_string(), Some("slow"), &store(), today());
        card.streak = 2;
        card.history.push(HistoryEntry {
            date: today(),
            outcome: HistoryOutcome::Correct,
            streak_after: 2,
        });

        let snoozed = snooze(&card, 3, today());

        assert_eq!(snoozed.next_review_date, DueDate::On(today() + Duration::days(3)));
        assert_eq!(snoozed.streak, card.streak);
        assert_eq!(snoozed.is_graduated, card.is_graduated);
        assert_eq!(snoozed.history, card.history);
    }

    #[test]
    fn test_edit_content_keeps_schedule() {
        let card = create_card("old".to_string(), Some("slow"), &store(), today());

        let edited = edit_card(&card, Some("new".to_string()), Some("slow"), &store(), today());

        assert_eq!(edited.content, "new");
        assert_eq!(edited.next_review_date, card.next_review_date);
        assert_eq!(edited.profile_id, "slow");
    }

    #[test]
    fn test_edit_profile_migrates() {
        let card = create_card("q".to_string(), Some("slow"), &store(), today());

        let edited = edit_card(&card, None, Some("fast"), &store(), today());

        // 14 days under "slow" becomes 0 under "fast"
        assert_eq!(edited.profile_id, "fast");
        assert_eq!(edited.next_review_date, DueDate::On(today()));
        assert_eq!(edited.content, "q");
    }

    #[test]
    fn test_edit_profile_keeps_overdue_date() {
        let mut store = store();
        let mut long = Profile::new("long", "Long", vec![1, 2, 4, 8, 16]);
        long.graduation_interval = 30;
        store.add_profile(long, 3650).unwrap();
        let overdue = today() - Duration::days(10);

        // Graduated under "slow", active again under the longer table
        let mut card = create_card("q".to_string(), Some("slow"), &store, today());
        card.streak = 3;
        card.is_graduated = true;
        card.next_review_date = DueDate::On(overdue);
        card.history = vec![
            HistoryEntry {
                date: overdue - Duration::days(60),
                outcome: HistoryOutcome::Correct,
                streak_after: 2,
            },
            HistoryEntry {
                date: overdue - Duration::days(60),
                outcome: HistoryOutcome::Graduated,
                streak_after: 3,
            },
        ];

        let moved = edit_card(&card, None, Some("long"), &store, today());
        assert_eq!(moved.profile_id, "long");
        assert_eq!(moved.next_review_date, DueDate::On(overdue));
        assert!(!moved.is_graduated);
        assert_eq!(moved.streak, 3);
        assert!(moved.history.iter().all(|e| e.outcome == HistoryOutcome::Correct));

        // And back: the short table graduates it, the date still stays
        let back = edit_card(&moved, None, Some("slow"), &store, today());
        assert_eq!(back.profile_id, "slow");
        assert_eq!(back.next_review_date, DueDate::On(overdue));
        assert!(back.is_graduated);
    }
}
