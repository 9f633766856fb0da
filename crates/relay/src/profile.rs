//! Persona profiles and the runtime profile selection.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::RelayError;

/// A named persona configuration.
///
/// Loaded as an immutable ordered list at startup; profiles are never
/// created or deleted at runtime, only selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name, used for the `profile <name>` command and nickname.
    pub name: String,
    /// Trigger pattern deciding which messages get a completion.
    pub regex: String,
    /// Persona context text for the system message.
    pub context: String,
    /// Question scaffold fragment.
    pub question: String,
    /// Answer scaffold fragment.
    pub answer: String,
}

/// The loaded profile list plus the current selection.
///
/// The current selection is the one process-wide mutable value here, so it
/// sits behind an `RwLock` in case the surrounding platform ever delivers
/// events concurrently.
#[derive(Debug)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
    triggers: Vec<Regex>,
    current: RwLock<usize>,
}

impl ProfileStore {
    /// Build a store from the loaded profile list.
    ///
    /// Compiles every trigger pattern up front; a pattern that fails to
    /// compile is a startup error. The first profile is current.
    pub fn new(profiles: Vec<Profile>) -> Result<Self, RelayError> {
        if profiles.is_empty() {
            return Err(RelayError::InvalidProfiles(
                "profile list is empty".to_string(),
            ));
        }

        let triggers = profiles
            .iter()
            .map(|p| {
                Regex::new(&p.regex).map_err(|e| {
                    RelayError::InvalidProfiles(format!(
                        "trigger pattern for profile {:?} does not compile: {}",
                        p.name, e
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            profiles,
            triggers,
            current: RwLock::new(0),
        })
    }

    /// All profiles, in file order.
    pub fn list(&self) -> &[Profile] {
        &self.profiles
    }

    /// Find a profile by exact name.
    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// The currently selected profile.
    pub async fn current(&self) -> Profile {
        let index = *self.current.read().await;
        self.profiles[index].clone()
    }

    /// Switch the current profile by name.
    ///
    /// Returns the newly selected profile, or [`RelayError::UnknownProfile`]
    /// if no profile has that name.
    pub async fn set_current(&self, name: &str) -> Result<Profile, RelayError> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| RelayError::UnknownProfile(name.to_string()))?;

        *self.current.write().await = index;
        info!(profile = name, "profile changed");

        Ok(self.profiles[index].clone())
    }

    /// Whether the current profile's trigger pattern matches the text.
    pub async fn trigger_matches(&self, text: &str) -> bool {
        let index = *self.current.read().await;
        self.triggers[index].is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_profiles() -> Vec<Profile> {
        vec![
            Profile {
                name: "tutor".to_string(),
                regex: "(?i)^hey tutor".to_string(),
                context: "You are a patient tutor.".to_string(),
                question: "\nQ: ".to_string(),
                answer: "\nA: ".to_string(),
            },
            Profile {
                name: "chef".to_string(),
                regex: "(?i)^hey chef".to_string(),
                context: "You are a grumpy chef.".to_string(),
                question: "\nQ: ".to_string(),
                answer: "\nA: ".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_first_profile_is_current() {
        let store = ProfileStore::new(test_profiles()).unwrap();
        assert_eq!(store.current().await.name, "tutor");
    }

    #[tokio::test]
    async fn test_set_current() {
        let store = ProfileStore::new(test_profiles()).unwrap();

        let selected = store.set_current("chef").await.unwrap();
        assert_eq!(selected.name, "chef");
        assert_eq!(store.current().await.name, "chef");
    }

    #[tokio::test]
    async fn test_set_current_unknown() {
        let store = ProfileStore::new(test_profiles()).unwrap();

        let result = store.set_current("poet").await;
        assert!(matches!(result, Err(RelayError::UnknownProfile(_))));
        // Selection is unchanged
        assert_eq!(store.current().await.name, "tutor");
    }

    #[tokio::test]
    async fn test_trigger_follows_current_profile() {
        let store = ProfileStore::new(test_profiles()).unwrap();

        assert!(store.trigger_matches("Hey tutor, what is 2+2?").await);
        assert!(!store.trigger_matches("hey chef, dinner ideas?").await);

        store.set_current("chef").await.unwrap();
        assert!(store.trigger_matches("hey chef, dinner ideas?").await);
        assert!(!store.trigger_matches("Hey tutor, what is 2+2?").await);
    }

    #[test]
    fn test_find_is_exact() {
        let store = ProfileStore::new(test_profiles()).unwrap();
        assert!(store.find("tutor").is_some());
        assert!(store.find("Tutor").is_none());
    }

    #[test]
    fn test_bad_trigger_pattern_is_startup_error() {
        let mut profiles = test_profiles();
        profiles[0].regex = "(unclosed".to_string();

        let result = ProfileStore::new(profiles);
        assert!(matches!(result, Err(RelayError::InvalidProfiles(_))));
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            ProfileStore::new(Vec::new()),
            Err(RelayError::InvalidProfiles(_))
        ));
    }
}
