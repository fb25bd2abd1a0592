//! Stored floor plans and write outcomes.

use std::fmt;

use crate::{RecordId, Timestamp, UserId};

/// A named floor plan held by the record store.
///
/// `owner` is the identity of the last successful writer. It is `None` for
/// records restored from the persisted text form, which does not carry
/// ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub data: String,
    pub last_modified: Timestamp,
    pub owner: Option<UserId>,
}

impl Record {
    pub fn new(id: RecordId, data: impl Into<String>, last_modified: Timestamp, owner: Option<UserId>) -> Self {
        Self {
            id,
            data: data.into(),
            last_modified,
            owner,
        }
    }
}

/// Result of a conflict-resolved write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOutcome {
    /// No record existed; a new one was created.
    Created,
    /// The writer outranked the owner and replaced the record.
    Updated,
    /// The writer did not outrank the owner; the record is unchanged.
    Rejected,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Created => write!(f, "created"),
            WriteOutcome::Updated => write!(f, "updated"),
            WriteOutcome::Rejected => write!(f, "rejected"),
        }
    }
}
