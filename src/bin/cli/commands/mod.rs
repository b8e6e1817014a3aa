pub mod cards;
pub mod forecast;
pub mod profile;
pub mod review;
pub mod show;
pub mod stats;
