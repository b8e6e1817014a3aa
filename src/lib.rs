//! mnemo: interval-table spaced repetition for missed material
//!
//! The scheduling engine lives in [`scheduling`] and is pure: every call
//! takes the card, its profile and `today`, and returns a new card.
//! [`storage`] persists cards and profiles as JSON, and [`service`] ties
//! the two together for front ends such as `mnemo-cli`.

pub mod config;
pub mod scheduling;
pub mod service;
pub mod storage;

pub use config::SchedulerConfig;
pub use scheduling::{Card, DueDate, Profile, ProfileStore, ReviewOutcome};
pub use service::{ReviewService, ServiceError, SyncSnapshot};
pub use storage::{FileStorage, ReviewRepository, StorageError};
