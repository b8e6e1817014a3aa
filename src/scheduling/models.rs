//! Data models for the scheduling engine

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Literal written in place of a date once a card has retired
pub const RETIRED: &str = "retired";

/// Wait used when a profile has no interval for the requested level
pub const FALLBACK_INTERVAL: u32 = 1;

fn default_overdue_tolerance() -> u32 {
    3
}

/// A named scheduling rule: an ordered interval table plus regression,
/// graduation and lateness parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    /// `intervals[k]` is the wait in days after reaching level `k`
    pub intervals: Vec<u32>,
    /// Levels lost on a wrong answer
    pub regress_step: u32,
    /// Maintenance cadence once graduated; 0 retires the card
    pub graduation_interval: u32,
    /// Days a review may run late before an extra level is lost
    #[serde(default = "default_overdue_tolerance")]
    pub overdue_tolerance: u32,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, intervals: Vec<u32>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            intervals,
            regress_step: 1,
            graduation_interval: 0,
            overdue_tolerance: default_overdue_tolerance(),
        }
    }

    /// Whether `streak` has exhausted the interval table
    pub fn graduates_at(&self, streak: u32) -> bool {
        streak as usize >= self.intervals.len()
    }

    /// Interval for an active card at `streak`, clamped to the last entry
    pub fn interval_at(&self, streak: u32) -> u32 {
        let index = (streak as usize).min(self.intervals.len().saturating_sub(1));
        self.intervals
            .get(index)
            .copied()
            .unwrap_or(FALLBACK_INTERVAL)
    }

    /// The wait a card at `streak` is scheduled under, graduation aware
    pub fn scheduled_interval(&self, streak: u32, graduated: bool) -> u32 {
        if graduated {
            self.graduation_interval
        } else {
            self.interval_at(streak)
        }
    }

    /// Graduated cards retire instead of entering maintenance
    pub fn retires_on_graduation(&self) -> bool {
        self.graduation_interval == 0
    }
}

/// When a card is next due: a calendar date or the terminal retired state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DueDate {
    On(NaiveDate),
    Retired,
}

impl DueDate {
    /// `days` after `today`, or `None` past the end of the calendar
    pub fn checked_after(today: NaiveDate, days: u32) -> Option<Self> {
        today.checked_add_days(Days::new(u64::from(days))).map(DueDate::On)
    }

    /// `days` after `today`, saturating at the last representable date
    pub fn after(today: NaiveDate, days: u32) -> Self {
        Self::checked_after(today, days).unwrap_or(DueDate::On(NaiveDate::MAX))
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DueDate::On(date) => Some(*date),
            DueDate::Retired => None,
        }
    }

    pub fn is_retired(&self) -> bool {
        matches!(self, DueDate::Retired)
    }

    /// Days between the due date and `today`; negative when not yet due
    pub fn days_overdue(&self, today: NaiveDate) -> Option<i64> {
        self.date().map(|date| (today - date).num_days())
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDate::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DueDate::Retired => f.write_str(RETIRED),
        }
    }
}

impl FromStr for DueDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == RETIRED {
            return Ok(DueDate::Retired);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DueDate::On)
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Answer given during a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOutcome {
    Correct,
    Wrong,
}

/// How a review is recorded in a card's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryOutcome {
    Correct,
    Wrong,
    /// A correct answer that exhausted the interval table
    Graduated,
}

/// A single review, appended in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub outcome: HistoryOutcome,
    pub streak_after: u32,
}

/// A reviewable unit of missed material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    /// Opaque to the engine
    pub content: String,
    pub profile_id: String,
    /// Current mastery level
    pub streak: u32,
    pub next_review_date: DueDate,
    /// Always `streak >= intervals.len()` under the resolved profile
    pub is_graduated: bool,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Bumped by storage on every successful save
    #[serde(default)]
    pub revision: u64,
}

impl Card {
    /// Check if the card is due for review on `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        match self.next_review_date {
            DueDate::On(date) => date <= today,
            DueDate::Retired => false,
        }
    }

    pub fn last_review(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }
}

/// Statistics across a user's cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub due_cards: usize,
    pub graduated_cards: usize,
    pub retired_cards: usize,
    pub max_streak: u32,
    /// Graduated share of all cards, 0-100
    pub mastery_rate: u32,
    pub reviews_today: usize,
    pub correct_today: usize,
}
