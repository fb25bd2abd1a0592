//! User priority ranks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authority rank of a user. A lower numeric value is a higher authority.
///
/// The derived ordering is the numeric one, so `Priority(1) < Priority(2)`
/// reads as "1 outranks 2". Use [`Priority::outranks`] at call sites where
/// the direction matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(i32);

impl Priority {
    /// Rank assigned to identities the directory does not know.
    /// No registered user can be outranked by it.
    pub const LOWEST: Priority = Priority(i32::MAX);

    pub const fn new(rank: i32) -> Self {
        Priority(rank)
    }

    pub const fn rank(self) -> i32 {
        self.0
    }

    /// Strictly higher authority than `other`. Equal ranks do not outrank.
    pub fn outranks(self, other: Priority) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Priority {
    fn from(rank: i32) -> Self {
        Priority(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outranks_is_strict() {
        assert!(Priority::new(1).outranks(Priority::new(2)));
        assert!(!Priority::new(2).outranks(Priority::new(2)));
        assert!(!Priority::new(3).outranks(Priority::new(2)));
        assert!(Priority::new(i32::MAX - 1).outranks(Priority::LOWEST));
        assert!(!Priority::LOWEST.outranks(Priority::LOWEST));
    }
}
