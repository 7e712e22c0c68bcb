use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Creation timestamp for a ledger transaction.
///
/// Combines wall-clock milliseconds with a logical counter so that stamps
/// within one wallet's chain are totally ordered and non-decreasing in
/// insertion order even when the wall clock has not advanced between two
/// appends.
///
/// Ordering: `physical_ms` → `logical`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainStamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub physical_ms: i64,
    /// Logical counter for entries at the same physical time.
    pub logical: u32,
}

impl ChainStamp {
    /// Create a stamp with explicit values.
    pub fn new(physical_ms: i64, logical: u32) -> Self {
        Self {
            physical_ms,
            logical,
        }
    }

    /// Create a stamp for the current wall-clock time.
    pub fn now() -> Self {
        Self {
            physical_ms: Utc::now().timestamp_millis(),
            logical: 0,
        }
    }

    /// The zero stamp.
    pub const fn zero() -> Self {
        Self {
            physical_ms: 0,
            logical: 0,
        }
    }

    /// The next stamp after `prev` at the current wall-clock time.
    ///
    /// If the clock has advanced past `prev`, the logical counter resets;
    /// otherwise `prev`'s counter is bumped so the result still orders
    /// strictly after it. This is what keeps per-wallet creation order
    /// non-decreasing under rapid appends or clock stalls.
    pub fn next_after(prev: &Self) -> Self {
        let now_ms = Utc::now().timestamp_millis();
        if now_ms > prev.physical_ms {
            Self::new(now_ms, 0)
        } else {
            Self::new(prev.physical_ms, prev.logical.saturating_add(1))
        }
    }

    /// The wall-clock component as a chrono timestamp.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.physical_ms)
            .single()
            .unwrap_or_default()
    }
}

impl PartialOrd for ChainStamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChainStamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.physical_ms
            .cmp(&other.physical_ms)
            .then(self.logical.cmp(&other.logical))
    }
}

impl fmt::Debug for ChainStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainStamp({}ms.{})", self.physical_ms, self.logical)
    }
}

impl fmt::Display for ChainStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.physical_ms, self.logical)
    }
}
