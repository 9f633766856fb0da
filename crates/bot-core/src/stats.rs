//! Process-wide usage counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

/// Running usage counters for the bot process.
///
/// Counters are atomic so the stats can be shared behind an `Arc` even if
/// the surrounding platform ever delivers events concurrently.
#[derive(Debug)]
pub struct UsageStats {
    scanned: AtomicU64,
    questions: AtomicU64,
    answers: AtomicU64,
    tokens: AtomicU64,
    profile_changes: AtomicU64,
    started: Instant,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageStats {
    /// Start a fresh set of counters.
    pub fn new() -> Self {
        Self {
            scanned: AtomicU64::new(0),
            questions: AtomicU64::new(0),
            answers: AtomicU64::new(0),
            tokens: AtomicU64::new(0),
            profile_changes: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Count an inbound message, whether or not it triggers anything.
    pub fn message_scanned(&self) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
        debug!("message scanned");
    }

    /// Count a completion request being made.
    pub fn question_asked(&self) {
        self.questions.fetch_add(1, Ordering::Relaxed);
        debug!("question asked");
    }

    /// Count a reply successfully delivered.
    pub fn answer_sent(&self) {
        self.answers.fetch_add(1, Ordering::Relaxed);
        debug!("answer sent");
    }

    /// Add the token usage reported by a completion response.
    pub fn tokens_used(&self, amount: u64) {
        self.tokens.fetch_add(amount, Ordering::Relaxed);
        debug!(amount, "tokens used");
    }

    /// Count a profile switch.
    pub fn profile_changed(&self) {
        self.profile_changes.fetch_add(1, Ordering::Relaxed);
        debug!("profile changed");
    }

    /// Total tokens consumed so far.
    pub fn total_tokens(&self) -> u64 {
        self.tokens.load(Ordering::Relaxed)
    }

    /// Time since the counters were started.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Render the counters for the stats command and shutdown message.
    pub fn summary(&self) -> String {
        let uptime = self.uptime().as_secs();
        format!(
            "Uptime: {}h{:02}m{:02}s\n\
             Messages scanned: {}\n\
             Questions asked: {}\n\
             Answers sent: {}\n\
             Tokens used: {}\n\
             Profile changes: {}",
            uptime / 3600,
            (uptime % 3600) / 60,
            uptime % 60,
            self.scanned.load(Ordering::Relaxed),
            self.questions.load(Ordering::Relaxed),
            self.answers.load(Ordering::Relaxed),
            self.tokens.load(Ordering::Relaxed),
            self.profile_changes.load(Ordering::Relaxed),
        )
    }
}
