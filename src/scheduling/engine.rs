//! Review state transition
//!
//! Given a card and its resolved profile, a review:
//! 1. Drops one extra level if the card is active and was reviewed more
//!    than `overdue_tolerance` days late
//! 2. Climbs one level on a correct answer, or falls back
//!    `regress_step` levels on a wrong one (never below 0)
//! 3. Graduates the card once the level exhausts the interval table
//! 4. Schedules the next review from the interval table, the maintenance
//!    cadence, or retires the card
//! 5. Appends a history entry
//!
//! Reviewing early is never penalised. `today` is always passed in.

use chrono::NaiveDate;

use super::models::{Card, DueDate, HistoryEntry, HistoryOutcome, Profile, ReviewOutcome};

/// Apply a review to `card` under `profile`, returning the updated card
///
/// # Arguments
/// * `card` - Card as it was before the review
/// * `profile` - The card's resolved profile; its interval table must be non-empty
/// * `outcome` - Whether the answer was correct
/// * `today` - The review date
pub fn review(card: &Card, profile: &Profile, outcome: ReviewOutcome, today: NaiveDate) -> Card {
    let effective_streak = if overdue_penalty_applies(card, profile, today) {
        card.streak.saturating_sub(1)
    } else {
        card.streak
    };

    let new_streak = match outcome {
        ReviewOutcome::Correct => effective_streak + 1,
        ReviewOutcome::Wrong => effective_streak.saturating_sub(profile.regress_step),
    };

    let is_graduated = profile.graduates_at(new_streak);
    let next_review_date = next_due(profile, new_streak, is_graduated, today);

    let recorded = match outcome {
        ReviewOutcome::Wrong => HistoryOutcome::Wrong,
        ReviewOutcome::Correct if is_graduated => HistoryOutcome::Graduated,
        ReviewOutcome::Correct => HistoryOutcome::Correct,
    };

    let mut history = card.history.clone();
    history.push(HistoryEntry {
        date: today,
        outcome: recorded,
        streak_after: new_streak,
    });

    Card {
        streak: new_streak,
        next_review_date,
        is_graduated,
        history,
        ..card.clone()
    }
}

/// Whether reviewing `card` on `today` costs an extra level
pub fn overdue_penalty_applies(card: &Card, profile: &Profile, today: NaiveDate) -> bool {
    if card.is_graduated {
        return false;
    }
    match card.next_review_date.days_overdue(today) {
        Some(days) => days > i64::from(profile.overdue_tolerance),
        None => false,
    }
}

/// Due date for a card that has just reached `streak`
pub fn next_due(profile: &Profile, streak: u32, is_graduated: bool, today: NaiveDate) -> DueDate {
    if is_graduated && profile.retires_on_graduation() {
        DueDate::Retired
    } else {
        DueDate::after(today, profile.scheduled_interval(streak, is_graduated))
    }
}

/// Due dates a correct and a wrong answer would produce
/// Used to show the user what each answer would do before they pick one
pub fn preview(card: &Card, profile: &Profile, today: NaiveDate) -> [DueDate; 2] {
    let correct = review(card, profile, ReviewOutcome::Correct, today).next_review_date;
    let wrong = review(card, profile, ReviewOutcome::Wrong, today).next_review_date;
    [correct, wrong]
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i64) -> String {
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
