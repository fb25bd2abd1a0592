//! Offline change queue.
//!
//! Changes made while disconnected are queued and later replayed through
//! [`RecordStore::write`], so they are subject to exactly the same priority
//! rules as live writes.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::{info, warn};

use plansync_error::StoreError;
use plansync_types::{RecordId, UserId, WriteOutcome};

use crate::store::RecordStore;

/// A write waiting to be replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub id: RecordId,
    pub data: String,
    pub writer: UserId,
}

impl PendingChange {
    pub fn new(id: impl Into<RecordId>, data: impl Into<String>, writer: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            writer: writer.into(),
        }
    }
}

/// FIFO queue of pending changes.
#[derive(Debug, Default)]
pub struct OfflineQueue {
    pending: Mutex<VecDeque<PendingChange>>,
}

impl OfflineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, change: PendingChange) {
        self.pending.lock().push_back(change);
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Take every queued change, leaving the queue empty.
    pub fn drain(&self) -> Vec<PendingChange> {
        self.pending.lock().drain(..).collect()
    }
}

/// Result of replaying one change.
#[derive(Debug)]
pub struct SyncEntry {
    pub change: PendingChange,
    pub result: Result<WriteOutcome, StoreError>,
}

/// Per-change results of a synchronisation pass, in replay order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub entries: Vec<SyncEntry>,
}

impl SyncReport {
    fn count(&self, outcome: WriteOutcome) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.result, Ok(o) if o == outcome))
            .count()
    }

    pub fn created(&self) -> usize {
        self.count(WriteOutcome::Created)
    }

    pub fn updated(&self) -> usize {
        self.count(WriteOutcome::Updated)
    }

    pub fn rejected(&self) -> usize {
        self.count(WriteOutcome::Rejected)
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_err()).count()
    }
}

/// Replay every queued change through `store.write`, oldest first.
///
/// A change that errors is recorded in the report and the replay moves on;
/// the queue is always empty afterwards.
pub fn synchronize(store: &RecordStore, queue: &OfflineQueue) -> SyncReport {
    let mut report = SyncReport::default();
    for change in queue.drain() {
        let result = store.write(change.id.clone(), change.data.clone(), &change.writer);
        if let Err(err) = &result {
            warn!(record_id = %change.id, writer = %change.writer, error = %err, "offline change failed");
        }
        report.entries.push(SyncEntry { change, result });
    }
    info!(
        created = report.created(),
        updated = report.updated(),
        rejected = report.rejected(),
        failed = report.failed(),
        "offline changes synchronized"
    );
    report
}
