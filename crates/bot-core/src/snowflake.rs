//! Snowflake message-id timestamp decoding.

use thiserror::Error;

/// Milliseconds between the Unix epoch and the platform's snowflake epoch.
const SNOWFLAKE_EPOCH_MS: u64 = 1_420_070_400_000;

/// Low bits of a snowflake reserved for worker/sequence data.
const TIMESTAMP_SHIFT: u32 = 22;

/// Error decoding a snowflake identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnowflakeError {
    /// The identifier is not a decimal integer.
    #[error("malformed message id: {0:?}")]
    Malformed(String),
}

/// Decode the millisecond Unix timestamp embedded in a message identifier.
///
/// The top bits of the numeric id count milliseconds since the platform
/// epoch; shifting out the low 22 bits and adding the epoch offset yields
/// milliseconds since the Unix epoch.
pub fn decode_timestamp_ms(id: &str) -> Result<u64, SnowflakeError> {
    let raw: u64 = id
        .parse()
        .map_err(|_| SnowflakeError::Malformed(id.to_string()))?;
    Ok((raw >> TIMESTAMP_SHIFT) + SNOWFLAKE_EPOCH_MS)
}

/// Build a snowflake carrying the given Unix-millisecond timestamp.
#[cfg(test)]
pub(crate) fn snowflake_at(unix_ms: u64) -> String {
    ((unix_ms - SNOWFLAKE_EPOCH_MS) << TIMESTAMP_SHIFT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_round_trip() {
        let ts = 1_672_531_200_000; // 2023-01-01T00:00:00Z
        let id = snowflake_at(ts);
        assert_eq!(decode_timestamp_ms(&id).unwrap(), ts);
    }

    #[test]
    fn test_decode_zero_is_epoch() {
        assert_eq!(decode_timestamp_ms("0").unwrap(), SNOWFLAKE_EPOCH_MS);
    }

    #[test]
    fn test_decode_malformed() {
        let err = decode_timestamp_ms("not-a-number").unwrap_err();
        assert!(matches!(err, SnowflakeError::Malformed(_)));
    }
}
