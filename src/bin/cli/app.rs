use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};

use mnemo_lib::scheduling::{Card, Profile};
use mnemo_lib::{FileStorage, ReviewService, SchedulerConfig};

/// Shared application state for CLI commands
pub struct App {
    pub service: ReviewService<FileStorage>,
    pub today: NaiveDate,
}

impl App {
    /// Initialize from the given or default data directory
    pub fn new(data_dir: Option<PathBuf>, user: &str, today: Option<NaiveDate>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FileStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let config = SchedulerConfig::load(&data_dir)
            .with_context(|| format!("Failed to read config in {}", data_dir.display()))?;
        let storage = FileStorage::new(data_dir);

        Ok(Self {
            service: ReviewService::new(storage, user, config),
            today: today.unwrap_or_else(|| Local::now().date_naive()),
        })
    }

    /// Find a card by id prefix
    pub fn find_card(&self, id: &str) -> Result<Card> {
        let cards = self.service.cards().context("Failed to list cards")?;
        let id_lower = id.to_lowercase();

        let matches: Vec<&Card> = cards
            .iter()
            .filter(|c| c.id.to_string().starts_with(&id_lower))
            .collect();

        match matches.len() {
            0 => bail!("No card matching '{}'", id),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous card id '{}'. Matches:\n{}", id,
                matches.iter().map(|c| format!("  - {} {}", c.id, c.content)).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Find a profile by id, or by name (case-insensitive prefix match)
    pub fn find_profile(&self, key: &str) -> Result<Profile> {
        let store = self.service.profiles().context("Failed to load profiles")?;
        if let Some(profile) = store.get(key) {
            return Ok(profile.clone());
        }

        let key_lower = key.to_lowercase();
        let profiles = store.profiles();

        if let Some(p) = profiles.iter().find(|p| p.name.to_lowercase() == key_lower) {
            return Ok(p.clone());
        }

        let matches: Vec<&Profile> = profiles
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with(&key_lower))
            .collect();

        match matches.len() {
            0 => bail!("No profile matching '{}'. Available profiles:\n{}", key,
                profiles.iter().map(|p| format!("  - {} ({})", p.name, p.id)).collect::<Vec<_>>().join("\n")),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous profile name '{}'. Matches:\n{}", key,
                matches.iter().map(|p| format!("  - {} ({})", p.name, p.id)).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Resolve an optional profile argument to a profile id
    pub fn profile_id(&self, key: Option<&str>) -> Result<Option<String>> {
        key.map(|k| self.find_profile(k).map(|p| p.id)).transpose()
    }
}
