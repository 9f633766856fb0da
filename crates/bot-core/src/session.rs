//! Idle-session reset policy.
//!
//! Conversation history for a user is purged when too much wall-clock time
//! has passed between their newest message and the last one on record. The
//! elapsed time is derived entirely from the timestamps embedded in the two
//! message identifiers; no clock is consulted.

use std::time::Duration;

use crate::snowflake::{decode_timestamp_ms, SnowflakeError};

/// Idle time after which a user's stored conversation is considered stale.
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(5 * 60);

/// Decide whether the gap between two message identifiers exceeds the idle
/// threshold.
///
/// Returns `false` when either identifier is absent (a brand-new
/// conversation never resets). The caller is responsible for purging the
/// user's stored turns when this returns `true`, before recording the new
/// message.
pub fn should_reset(newest: Option<&str>, previous: Option<&str>) -> Result<bool, SnowflakeError> {
    let (newest, previous) = match (newest, previous) {
        (Some(n), Some(p)) => (n, p),
        _ => return Ok(false),
    };

    let newest_ms = decode_timestamp_ms(newest)?;
    let previous_ms = decode_timestamp_ms(previous)?;

    // Out-of-order delivery yields a zero gap rather than an underflow.
    let elapsed = Duration::from_millis(newest_ms.saturating_sub(previous_ms));
    Ok(elapsed > IDLE_THRESHOLD)
}
