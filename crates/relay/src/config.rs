//! JSON configuration and profile loading.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::RelayError;
use crate::profile::Profile;

/// Bot process configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Chat platform auth token.
    pub bot_token: String,

    /// Completion API bearer token.
    pub gpt_api_key: String,

    /// Verbose console tracing toggle. Maps to a debug-level tracing
    /// filter when true, info otherwise.
    #[serde(default)]
    pub log: bool,

    /// Whether to reply with an apology when the completion call fails.
    /// Defaults to true.
    #[serde(default = "default_notify_on_error")]
    pub notify_on_error: bool,
}

fn default_notify_on_error() -> bool {
    true
}

impl RelayConfig {
    /// Parse a configuration from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, RelayError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Load the bot configuration from a JSON file.
///
/// A missing or malformed file is a startup error; the process should not
/// serve without configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<RelayConfig, RelayError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config = RelayConfig::from_json(&text)?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parse a profile list from its JSON text.
///
/// An empty list is rejected: the bot needs at least one profile to select
/// as current.
pub fn profiles_from_json(json: &str) -> Result<Vec<Profile>, RelayError> {
    let profiles: Vec<Profile> = serde_json::from_str(json)?;
    if profiles.is_empty() {
        return Err(RelayError::InvalidProfiles(
            "profile list is empty".to_string(),
        ));
    }
    Ok(profiles)
}

/// Load the profile list from a JSON file.
pub fn load_profiles(path: impl AsRef<Path>) -> Result<Vec<Profile>, RelayError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let profiles = profiles_from_json(&text)?;

    info!(
        "Loaded {} profiles from {}",
        profiles.len(),
        path.display()
    );
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json() {
        let config = RelayConfig::from_json(
            r#"{"botToken": "tok-123", "gptApiKey": "sk-456", "log": true}"#,
        )
        .unwrap();

        assert_eq!(config.bot_token, "tok-123");
        assert_eq!(config.gpt_api_key, "sk-456");
        assert!(config.log);
        assert!(config.notify_on_error);
    }

    #[test]
    fn test_config_defaults() {
        let config =
            RelayConfig::from_json(r#"{"botToken": "t", "gptApiKey": "k"}"#).unwrap();

        assert!(!config.log);
        assert!(config.notify_on_error);
    }

    #[test]
    fn test_config_notify_override() {
        let config = RelayConfig::from_json(
            r#"{"botToken": "t", "gptApiKey": "k", "notifyOnError": false}"#,
        )
        .unwrap();

        assert!(!config.notify_on_error);
    }

    #[test]
    fn test_config_missing_field_is_error() {
        assert!(RelayConfig::from_json(r#"{"botToken": "t"}"#).is_err());
    }

    #[test]
    fn test_profiles_from_json() {
        let profiles = profiles_from_json(
            r#"[
                {"name": "tutor", "regex": "(?i)^hey tutor", "context": "You tutor.", "question": "\nQ: ", "answer": "\nA: "},
                {"name": "chef", "regex": "(?i)^hey chef", "context": "You cook.", "question": "\nQ: ", "answer": "\nA: "}
            ]"#,
        )
        .unwrap();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "tutor");
        assert_eq!(profiles[1].context, "You cook.");
    }

    #[test]
    fn test_empty_profile_list_is_error() {
        let result = profiles_from_json("[]");
        assert!(matches!(result, Err(RelayError::InvalidProfiles(_))));
    }
}
