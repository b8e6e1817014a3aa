//! Profile store and interval validation
//!
//! A [`ProfileStore`] is never empty, its default id always names a stored
//! profile, and every profile has an id, a name and at least one interval.
//! These are checked on construction, on load and on every edit, so the
//! engine can look profiles up without re-validating.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::Profile;

/// Default upper bound for a single interval, in days
pub const DEFAULT_MAX_INTERVAL_DAYS: u32 = 3650;

/// Id of the built-in default profile
pub const DEFAULT_PROFILE_ID: &str = "ebbinghaus";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a whole number of days")]
    NotAnInteger(String),

    #[error("'{0}' is negative; intervals must be zero or more days")]
    Negative(String),

    #[error("'{value}' days is unreasonably large (at most {max} days)")]
    TooLarge { value: String, max: u32 },

    #[error("At least one interval is required")]
    EmptyIntervals,

    #[error("Profile id cannot be empty")]
    EmptyId,

    #[error("Profile name cannot be empty")]
    EmptyName,

    #[error("A profile named '{0}' already exists")]
    DuplicateName(String),

    #[error("A profile with id '{0}' already exists")]
    DuplicateId(String),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("A profile store needs at least one profile")]
    EmptyStore,

    #[error("Cannot delete the last remaining profile")]
    LastProfile,

    #[error("Cannot delete '{0}' while it is the default profile; choose another default first")]
    DeleteDefault(String),
}

/// Parse a comma-separated interval list such as `"0, 1, 2, 4"`
pub fn parse_intervals(input: &str, max_days: u32) -> Result<Vec<u32>, ProfileError> {
    if input.trim().is_empty() {
        return Err(ProfileError::EmptyIntervals);
    }

    input
        .split(',')
        .map(|raw| parse_interval(raw.trim(), max_days))
        .collect()
}

fn parse_interval(raw: &str, max_days: u32) -> Result<u32, ProfileError> {
    if let Ok(value) = raw.parse::<i64>() {
        if value < 0 {
            return Err(ProfileError::Negative(raw.to_string()));
        }
        if value > i64::from(max_days) {
            return Err(too_large(raw, max_days));
        }
        return Ok(value as u32);
    }

    // Decimals and out-of-range integers land here
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value < 0.0 {
                Err(ProfileError::Negative(raw.to_string()))
            } else if value.fract() != 0.0 {
                Err(ProfileError::NotAnInteger(raw.to_string()))
            } else if value > f64::from(max_days) {
                Err(too_large(raw, max_days))
            } else {
                Ok(value as u32)
            }
        }
        _ => Err(ProfileError::NotANumber(raw.to_string())),
    }
}

fn too_large(raw: &str, max: u32) -> ProfileError {
    ProfileError::TooLarge {
        value: raw.to_string(),
        max,
    }
}

/// Check a profile definition before it is saved
pub fn validate_profile(profile: &Profile, max_days: u32) -> Result<(), ProfileError> {
    check_shape(profile)?;
    for &days in profile.intervals.iter().chain([profile.graduation_interval].iter()) {
        if days > max_days {
            return Err(too_large(&days.to_string(), max_days));
        }
    }
    Ok(())
}

/// Checks that hold for every stored profile, whatever the interval bound
fn check_shape(profile: &Profile) -> Result<(), ProfileError> {
    if profile.id.trim().is_empty() {
        return Err(ProfileError::EmptyId);
    }
    if profile.name.trim().is_empty() {
        return Err(ProfileError::EmptyName);
    }
    if profile.intervals.is_empty() {
        return Err(ProfileError::EmptyIntervals);
    }
    Ok(())
}

/// Profiles every new user starts with
pub fn builtin_profiles() -> Vec<Profile> {
    vec![
        Profile {
            id: DEFAULT_PROFILE_ID.to_string(),
            name: "Ebbinghaus (long-term)".to_string(),
            intervals: vec![0, 1, 2, 4, 7, 15, 30, 60],
            regress_step: 1,
            graduation_interval: 90,
            overdue_tolerance: 3,
        },
        Profile {
            id: "daily_habit".to_string(),
            name: "Daily habit".to_string(),
            intervals: vec![0],
            // Wrong answers come back tomorrow regardless
            regress_step: 0,
            graduation_interval: 1,
            overdue_tolerance: 3,
        },
        Profile {
            id: "exam_week".to_string(),
            name: "Exam cram".to_string(),
            intervals: vec![0, 1, 1, 2, 3],
            regress_step: 2,
            graduation_interval: 3,
            overdue_tolerance: 1,
        },
        Profile {
            id: "today_only".to_string(),
            name: "Today only".to_string(),
            intervals: vec![0],
            regress_step: 0,
            graduation_interval: 0,
            overdue_tolerance: 3,
        },
        Profile {
            id: "tomorrow_only".to_string(),
            name: "Tomorrow only".to_string(),
            intervals: vec![1],
            regress_step: 0,
            graduation_interval: 0,
            overdue_tolerance: 3,
        },
    ]
}

/// Serialized form, checked on the way in
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileStoreData {
    profiles: Vec<Profile>,
    default_id: String,
}

impl TryFrom<ProfileStoreData> for ProfileStore {
    type Error = ProfileError;

    fn try_from(data: ProfileStoreData) -> Result<Self, Self::Error> {
        ProfileStore::new(data.profiles, data.default_id)
    }
}

/// Ordered set of profiles plus the designated default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProfileStoreData")]
pub struct ProfileStore {
    profiles: Vec<Profile>,
    default_id: String,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self {
            profiles: builtin_profiles(),
            default_id: DEFAULT_PROFILE_ID.to_string(),
        }
    }
}

impl ProfileStore {
    pub fn new(profiles: Vec<Profile>, default_id: impl Into<String>) -> Result<Self, ProfileError> {
        let default_id = default_id.into();
        if profiles.is_empty() {
            return Err(ProfileError::EmptyStore);
        }
        for (i, profile) in profiles.iter().enumerate() {
            check_shape(profile)?;
            let earlier = &profiles[..i];
            if earlier.iter().any(|p| p.id == profile.id) {
                return Err(ProfileError::DuplicateId(profile.id.clone()));
            }
            if earlier.iter().any(|p| p.name == profile.name) {
                return Err(ProfileError::DuplicateName(profile.name.clone()));
            }
        }
        if !profiles.iter().any(|p| p.id == default_id) {
            return Err(ProfileError::NotFound(default_id));
        }
        Ok(Self {
            profiles,
            default_id,
        })
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn default_profile(&self) -> &Profile {
        // Construction and every edit keep the store non-empty
        self.get(&self.default_id).unwrap_or(&self.profiles[0])
    }

    /// Look up a profile, falling back to the default for dangling ids
    pub fn resolve(&self, id: &str) -> &Profile {
        match self.get(id) {
            Some(profile) => profile,
            None => {
                log::debug!("Profile '{}' not found, using default '{}'", id, self.default_id);
                self.default_profile()
            }
        }
    }

    /// Add a new profile after validating it
    pub fn add_profile(&mut self, profile: Profile, max_days: u32) -> Result<(), ProfileError> {
        validate_profile(&profile, max_days)?;
        if self.contains(&profile.id) {
            return Err(ProfileError::DuplicateId(profile.id));
        }
        if self.profiles.iter().any(|p| p.name == profile.name) {
            return Err(ProfileError::DuplicateName(profile.name));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Replace a profile definition, returning the one it replaced
    pub fn update_profile(&mut self, profile: Profile, max_days: u32) -> Result<Profile, ProfileError> {
        validate_profile(&profile, max_days)?;
        let pos = self
            .profiles
            .iter()
            .position(|p| p.id == profile.id)
            .ok_or_else(|| ProfileError::NotFound(profile.id.clone()))?;
        if self
            .profiles
            .iter()
            .any(|p| p.id != profile.id && p.name == profile.name)
        {
            return Err(ProfileError::DuplicateName(profile.name));
        }
        Ok(std::mem::replace(&mut self.profiles[pos], profile))
    }

    /// Remove a profile; the last profile and the default cannot be removed
    pub fn remove_profile(&mut self, id: &str) -> Result<Profile, ProfileError> {
        let pos = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ProfileError::NotFound(id.to_string()))?;
        if self.profiles.len() == 1 {
            return Err(ProfileError::LastProfile);
        }
        if self.default_id == id {
            return Err(ProfileError::DeleteDefault(self.profiles[pos].name.clone()));
        }
        Ok(self.profiles.remove(pos))
    }

    pub fn set_default(&mut self, id: &str) -> Result<(), ProfileError> {
        if !self.contains(id) {
            return Err(ProfileError::NotFound(id.to_string()));
        }
        self.default_id = id.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = DEFAULT_MAX_INTERVAL_DAYS;

    #[test]
    fn test_parse_intervals() {
        assert_eq!(parse_intervals("14, 21,28", MAX).unwrap(), vec![14, 21, 28]);
        assert_eq!(parse_intervals("0", MAX).unwrap(), vec![0]);
        assert_eq!(parse_intervals("3.0", MAX).unwrap(), vec![3]);
    }

    #[test]
    fn test_parse_intervals_reports_each_rule() {
        assert_eq!(parse_intervals("", MAX), Err(ProfileError::EmptyIntervals));
        assert_eq!(
            parse_intervals("1, two", MAX),
            Err(ProfileError::NotANumber("two".to_string()))
        );
        assert_eq!(
            parse_intervals("1,,2", MAX),
            Err(ProfileError::NotANumber(String::new()))
        );
        assert_eq!(
            parse_intervals("1.5", MAX),
            Err(ProfileError::NotAnInteger("1.5".to_string()))
        );
        assert_eq!(
            parse_intervals("2, -1", MAX),
            Err(ProfileError::Negative("-1".to_string()))
        );
        assert_eq!(
            parse_intervals("99999", MAX),
            Err(ProfileError::TooLarge {
                value: "99999".to_string(),
                max: MAX
            })
        );
        assert!(matches!(
            parse_intervals("100000000000000000000", MAX),
            Err(ProfileError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_builtin_store_is_valid() {
        let store = ProfileStore::default();
        assert_eq!(store.profiles().len(), 5);
        assert_eq!(store.default_profile().id, DEFAULT_PROFILE_ID);
        for profile in store.profiles() {
            validate_profile(profile, MAX).unwrap();
        }
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let store = ProfileStore::default();
        assert_eq!(store.resolve("exam_week").id, "exam_week");
        assert_eq!(store.resolve("gone").id, DEFAULT_PROFILE_ID);
    }

    #[test]
    fn test_add_rejects_duplicate_name() {
        let mut store = ProfileStore::default();
        let dup = Profile::new("other", "Daily habit", vec![1]);
        assert_eq!(
            store.add_profile(dup, MAX),
            Err(ProfileError::DuplicateName("Daily habit".to_string()))
        );

        // Names are compared case-sensitively
        let different_case = Profile::new("other", "daily habit", vec![1]);
        store.add_profile(different_case, MAX).unwrap();
        assert_eq!(store.profiles().len(), 6);
    }

    #[test]
    fn test_add_rejects_empty_intervals() {
        let mut store = ProfileStore::default();
        let empty = Profile::new("empty", "Empty", vec![]);
        assert_eq!(store.add_profile(empty, MAX), Err(ProfileError::EmptyIntervals));
        assert!(!store.contains("empty"));
    }

    #[test]
    fn test_update_returns_previous() {
        let mut store = ProfileStore::default();
        let mut edited = store.get("exam_week").unwrap().clone();
        edited.intervals = vec![1, 5];

        let previous = store.update_profile(edited, MAX).unwrap();
        assert_eq!(previous.intervals, vec![0, 1, 1, 2, 3]);
        assert_eq!(store.get("exam_week").unwrap().intervals, vec![1, 5]);

        // Keeping its own name is not a conflict, taking another's is
        let mut renamed = store.get("exam_week").unwrap().clone();
        renamed.name = "Today only".to_string();
        assert!(matches!(
            store.update_profile(renamed, MAX),
            Err(ProfileError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_remove_guards() {
        let mut store = ProfileStore::default();
        assert!(matches!(
            store.remove_profile(DEFAULT_PROFILE_ID),
            Err(ProfileError::DeleteDefault(_))
        ));
        store.remove_profile("today_only").unwrap();
        assert!(!store.contains("today_only"));

        let mut single = ProfileStore::new(vec![Profile::new("only", "Only", vec![1])], "only").unwrap();
        assert_eq!(single.remove_profile("only"), Err(ProfileError::LastProfile));
        assert!(matches!(single.remove_profile("nope"), Err(ProfileError::NotFound(_))));
    }

    #[test]
    fn test_set_default_requires_existing_profile() {
        let mut store = ProfileStore::default();
        assert!(store.set_default("missing").is_err());
        store.set_default("daily_habit").unwrap();
        assert_eq!(store.default_profile().id, "daily_habit");
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let store = ProfileStore::default();
        let json = serde_json::to_string(&store).unwrap();
        let back: ProfileStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);

        let dangling = r#"{"profiles":[{"id":"a","name":"A","intervals":[1],"regressStep":1,"graduationInterval":0}],"defaultId":"b"}"#;
        assert!(serde_json::from_str::<ProfileStore>(dangling).is_err());

        let empty = r#"{"profiles":[],"defaultId":"a"}"#;
        assert!(serde_json::from_str::<ProfileStore>(empty).is_err());

        let no_intervals = r#"{"profiles":[{"id":"a","name":"A","intervals":[],"regressStep":1,"graduationInterval":0}],"defaultId":"a"}"#;
        let err = serde_json::from_str::<ProfileStore>(no_intervals).unwrap_err();
        assert!(err.to_string().contains("At least one interval"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let mut store = ProfileStore::default();
        let blank = Profile::new("", "Punctuation", vec![1]);
        assert_eq!(store.add_profile(blank.clone(), MAX), Err(ProfileError::EmptyId));
        assert_eq!(ProfileStore::new(vec![blank], ""), Err(ProfileError::EmptyId));
    }
}
