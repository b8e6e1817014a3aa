//! Interval-table spaced repetition for mnemo
//!
//! This module provides:
//! - Scheduling profiles and the profile store
//! - The review state transition (level, due date, graduation, history)
//! - Optimistic timeline projection for calendar views
//! - Re-scheduling when a profile is edited or a card changes profile
//! - Card creation, snoozing and editing
//!
//! Every function takes `today` explicitly and performs no I/O.

pub mod engine;
pub mod lifecycle;
pub mod migrate;
pub mod models;
pub mod profiles;
pub mod timeline;

pub use engine::{format_interval, preview, review};
pub use lifecycle::{create_card, edit_card, snooze};
pub use migrate::{migrate, migrate_profile_edit};
pub use models::*;
pub use profiles::{parse_intervals, ProfileError, ProfileStore};
pub use timeline::{forecast, project, ProjectionOptions};
