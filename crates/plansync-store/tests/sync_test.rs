//! Tests for replaying offline changes

use std::sync::Arc;

use plansync_error::StoreError;
use plansync_store::{synchronize, ManualClock, OfflineQueue, PendingChange, PriorityDirectory, RecordStore};
use plansync_types::{User, UserId, WriteOutcome};

fn store() -> RecordStore {
    let directory = PriorityDirectory::new(vec![
        User::new("admin", "password", 1),
        User::new("manager", "manage", 2),
    ]);
    RecordStore::new(Arc::new(directory)).with_clock(Arc::new(ManualClock::new(7)))
}

#[test]
fn test_replay_applies_priority_rules_in_order() {
    let store = store();
    let queue = OfflineQueue::new();
    queue.push(PendingChange::new("A", "draft", "manager"));
    queue.push(PendingChange::new("A", "final", "admin"));
    queue.push(PendingChange::new("A", "late edit", "manager"));
    queue.push(PendingChange::new("B", "annex", "manager"));
    assert_eq!(queue.len(), 4);

    let report = synchronize(&store, &queue);
    let outcomes: Vec<_> = report
        .entries
        .iter()
        .map(|e| *e.result.as_ref().unwrap())
        .collect();
    assert_eq!(
        outcomes,
        vec![
            WriteOutcome::Created,
            WriteOutcome::Updated,
            WriteOutcome::Rejected,
            WriteOutcome::Created,
        ]
    );
    assert_eq!(report.created(), 2);
    assert_eq!(report.updated(), 1);
    assert_eq!(report.rejected(), 1);
    assert_eq!(report.failed(), 0);

    assert!(queue.is_empty());
    assert_eq!(store.get("A").unwrap().data, "final");
    assert_eq!(store.get("A").unwrap().owner, Some(UserId::new("admin")));
}

#[test]
fn test_failed_change_does_not_stop_replay() {
    let store = store();
    let queue = OfflineQueue::new();
    queue.push(PendingChange::new("A", "has,comma", "admin"));
    queue.push(PendingChange::new("B", "fine", "admin"));

    let report = synchronize(&store, &queue);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.entries[0].result,
        Err(StoreError::InvalidField { field: "data", .. })
    ));
    assert_eq!(report.created(), 1);
    assert!(!store.contains("A"));
    assert!(store.contains("B"));
    assert!(queue.is_empty());
}

#[test]
fn test_empty_queue_is_a_no_op() {
    let store = store();
    let report = synchronize(&store, &OfflineQueue::new());
    assert!(report.entries.is_empty());
    assert!(store.is_empty());
}
