//! Unix-second timestamps.

use chrono::Utc;
use std::fmt;

/// Seconds since the Unix epoch, as written in the persisted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_secs(secs: i64) -> Self {
        Timestamp(secs)
    }

    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_plain_seconds() {
        assert_eq!(Timestamp::from_secs(1_700_000_000).to_string(), "1700000000");
        assert!(Timestamp::now() > Timestamp::from_secs(1_700_000_000));
    }
}
