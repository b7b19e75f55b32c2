//! Block time and its sortable byte encoding.
//!
//! Key encoding is PROTOCOL. Expiry queues key their buckets with the
//! 29-byte ASCII rendering produced by [`BlockTime::to_sortable_bytes`];
//! lexicographic order over those keys equals chronological order. Never
//! inline a different time format in key construction.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of the sortable time encoding: `YYYY-MM-DDTHH:MM:SS.nnnnnnnnn`
pub const SORTABLE_TIME_LEN: usize = 29;

const SORTABLE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";

/// Errors decoding time values from key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("sortable time must be {SORTABLE_TIME_LEN} bytes (got {0})")]
    BadLength(usize),

    #[error("malformed sortable time: {0}")]
    Malformed(String),

    #[error("block time arithmetic overflow")]
    Overflow,
}

/// A span of block time, stored as whole seconds.
///
/// Module parameters (rent durations, auction windows, grace periods) are
/// expressed in seconds; sub-second spans have no meaning at block
/// granularity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Duration {
    secs: i64,
}

impl Duration {
    pub const fn from_secs(secs: i64) -> Self {
        Self { secs }
    }

    pub const fn as_secs(&self) -> i64 {
        self.secs
    }

    pub fn checked_add(&self, other: Duration) -> Option<Duration> {
        Some(Duration::from_secs(self.secs.checked_add(other.secs)?))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs)
    }
}

/// An instant of block header time (UTC, nanosecond precision).
///
/// "Now" always means the current block header time; wall-clock time is
/// never consulted by the state machine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockTime(DateTime<Utc>);

impl BlockTime {
    pub fn new(inner: DateTime<Utc>) -> Self {
        Self(inner)
    }

    /// Construct from a unix timestamp in seconds. Values outside the
    /// representable range (which block headers never carry) clamp to the
    /// epoch.
    pub fn from_unix(secs: i64) -> Self {
        Self(
            Utc.timestamp_opt(secs, 0)
                .single()
                .unwrap_or(DateTime::UNIX_EPOCH),
        )
    }

    pub fn inner(&self) -> DateTime<Utc> {
        self.0
    }

    /// The canonical fixed-width key encoding.
    pub fn to_sortable_bytes(&self) -> [u8; SORTABLE_TIME_LEN] {
        let rendered = self.0.format(SORTABLE_TIME_FORMAT).to_string();
        let mut out = [0u8; SORTABLE_TIME_LEN];
        out.copy_from_slice(rendered.as_bytes());
        out
    }

    /// Decode a key suffix produced by [`Self::to_sortable_bytes`].
    pub fn from_sortable_bytes(bytes: &[u8]) -> Result<Self, TimeError> {
        if bytes.len() != SORTABLE_TIME_LEN {
            return Err(TimeError::BadLength(bytes.len()));
        }
        let text =
            std::str::from_utf8(bytes).map_err(|e| TimeError::Malformed(e.to_string()))?;
        let naive = NaiveDateTime::parse_from_str(text, SORTABLE_TIME_FORMAT)
            .map_err(|e| TimeError::Malformed(e.to_string()))?;
        Ok(Self(Utc.from_utc_datetime(&naive)))
    }

    pub fn checked_add(&self, d: Duration) -> Result<Self, TimeError> {
        self.0
            .checked_add_signed(chrono::Duration::seconds(d.as_secs()))
            .map(Self)
            .ok_or(TimeError::Overflow)
    }
}

impl Default for BlockTime {
    fn default() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }
}

impl fmt::Display for BlockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
