//! Mention-command parsing.
//!
//! Commands only apply to messages that mention the bot: `profile <name>`
//! switches the persona, `stats` reports the usage counters, `help` lists
//! both.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile::Profile;

static PROFILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)profile\s+(?P<name>\w+)").expect("static pattern"));
static STATS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)stats$").expect("static pattern"));
static HELP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)help$").expect("static pattern"));

/// A recognized mention command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch to the named profile.
    SwitchProfile(String),
    /// Report usage statistics.
    Stats,
    /// List commands and profiles.
    Help,
}

/// Parse a command out of message text, if one is present.
pub fn parse_command(text: &str) -> Option<Command> {
    if let Some(captures) = PROFILE_RE.captures(text) {
        return Some(Command::SwitchProfile(captures["name"].to_string()));
    }
    if STATS_RE.is_match(text) {
        return Some(Command::Stats);
    }
    if HELP_RE.is_match(text) {
        return Some(Command::Help);
    }
    None
}

/// Render the help message: available commands plus the profile list with
/// each trigger pattern.
pub fn help_text(bot_name: &str, profiles: &[Profile]) -> String {
    let mut msg = String::from("```\nCommands:");
    msg.push_str(&format!("\n@{bot_name} profile <name>: change the profile"));
    msg.push_str(&format!("\n@{bot_name} stats: show statistics"));
    msg.push_str(&format!("\n@{bot_name} help: show this message"));
    msg.push_str("\n\nProfiles:");
    for profile in profiles {
        msg.push_str(&format!("\n- {}: {}", profile.name, profile.regex));
    }
    msg.push_str("\n```");
    msg
}
