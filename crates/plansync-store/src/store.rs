// Record store with priority-based conflict resolution
//
// Every write goes through one store-wide lock so that reading the current
// owner's rank, comparing it with the writer's and mutating the record
// happen as a single step.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use plansync_error::{CodecResult, StoreError, StoreResult};
use plansync_types::{Priority, Record, RecordId, Timestamp, UserId, WriteOutcome};

use crate::clock::{Clock, SystemClock};
use crate::codec::DELIMITER;
use crate::directory::PriorityLookup;

/// Destination for the snapshot taken whenever a brand-new record is created.
pub trait BackupTarget: Send {
    fn write_snapshot(&mut self, records: &[&Record]) -> CodecResult<()>;
}

/// The shared collection of floor plans.
pub struct RecordStore {
    records: RwLock<BTreeMap<RecordId, Record>>,
    directory: Arc<dyn PriorityLookup>,
    clock: Arc<dyn Clock>,
    backup: Option<Mutex<Box<dyn BackupTarget>>>,
}

impl RecordStore {
    /// Create an empty store ranking writers with `directory`.
    pub fn new(directory: Arc<dyn PriorityLookup>) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            directory,
            clock: Arc::new(SystemClock),
            backup: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Snapshot the whole store to `target` after every creation.
    pub fn with_backup(mut self, target: impl BackupTarget + 'static) -> Self {
        self.backup = Some(Mutex::new(Box::new(target)));
        self
    }

    /// Write `data` under `id` on behalf of an already authenticated writer.
    ///
    /// A missing record is created and owned by the writer. An existing one
    /// is replaced only when the writer strictly outranks its owner; on a
    /// tie the incumbent keeps it and the write is rejected without touching
    /// any field.
    ///
    /// # Errors
    ///
    /// `InvalidField` if `id` or `data` cannot be persisted; the store is not
    /// modified. `BackupFailed` if a record was created but the backup
    /// snapshot could not be written; the record stays in the store.
    pub fn write(
        &self,
        id: impl Into<RecordId>,
        data: impl Into<String>,
        writer: &UserId,
    ) -> StoreResult<WriteOutcome> {
        let id = id.into();
        let data = data.into();
        validate_id(&id)?;
        validate_data(&data)?;

        let writer_priority = self.directory.priority_of(writer.as_str());
        let mut records = self.records.write();
        let now = self.clock.now();

        let outcome = match records.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                let owner_priority = self.owner_priority(record);
                if writer_priority.outranks(owner_priority) {
                    record.data = data;
                    record.last_modified = now.max(record.last_modified);
                    record.owner = Some(writer.clone());
                    WriteOutcome::Updated
                } else {
                    debug!(
                        record_id = %id,
                        writer = %writer,
                        %writer_priority,
                        %owner_priority,
                        "insufficient priority"
                    );
                    WriteOutcome::Rejected
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(Record::new(id.clone(), data, now, Some(writer.clone())));
                WriteOutcome::Created
            }
        };
        debug!(record_id = %id, writer = %writer, %outcome, "write resolved");

        if outcome == WriteOutcome::Created {
            // Readers may proceed while the snapshot is written; writers
            // stay blocked until it is done.
            let records = RwLockWriteGuard::downgrade(records);
            self.backup_snapshot(&id, &records)?;
        }
        Ok(outcome)
    }

    pub fn get(&self, id: &str) -> Option<Record> {
        self.records.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.read().contains_key(id)
    }

    /// Every record, in key order, as of the moment of the call.
    pub fn all(&self) -> impl Iterator<Item = Record> {
        self.snapshot().into_iter()
    }

    /// A frozen copy of the store.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Rank of the current owner. Unowned records rank lowest.
    fn owner_priority(&self, record: &Record) -> Priority {
        record
            .owner
            .as_ref()
            .map_or(Priority::LOWEST, |owner| self.directory.priority_of(owner.as_str()))
    }

    fn backup_snapshot(
        &self,
        id: &RecordId,
        records: &BTreeMap<RecordId, Record>,
    ) -> StoreResult<()> {
        let Some(backup) = &self.backup else {
            return Ok(());
        };
        let snapshot: Vec<&Record> = records.values().collect();
        backup.lock().write_snapshot(&snapshot).map_err(|source| {
            warn!(record_id = %id, error = %source, "backup snapshot failed");
            StoreError::BackupFailed {
                record_id: id.to_string(),
                source,
            }
        })
    }

    /// Read access for the codec; holds the store lock for the guard's life.
    pub(crate) fn read_records(&self) -> RwLockReadGuard<'_, BTreeMap<RecordId, Record>> {
        self.records.read()
    }

    /// Upsert persisted entries in one step. Existing records keep their
    /// owner; new ones are unowned because the persisted form has none.
    pub(crate) fn upsert_loaded(&self, entries: Vec<(RecordId, String, Timestamp)>) -> usize {
        let mut records = self.records.write();
        let count = entries.len();
        for (id, data, last_modified) in entries {
            match records.entry(id) {
                Entry::Occupied(mut entry) => {
                    let record = entry.get_mut();
                    record.data = data;
                    record.last_modified = last_modified;
                }
                Entry::Vacant(entry) => {
                    let id = entry.key().clone();
                    entry.insert(Record::new(id, data, last_modified, None));
                }
            }
        }
        count
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.len())
            .field("backup", &self.backup.is_some())
            .finish()
    }
}

fn validate_id(id: &RecordId) -> StoreResult<()> {
    let id = id.as_str();
    if id.is_empty() {
        return Err(StoreError::invalid_field("id", "must not be empty"));
    }
    validate_persistable("id", id)
}

fn validate_data(data: &str) -> StoreResult<()> {
    validate_persistable("data", data)
}

// The persisted form has no escaping.
fn validate_persistable(field: &'static str, value: &str) -> StoreResult<()> {
    if value.contains(DELIMITER) {
        return Err(StoreError::invalid_field(
            field,
            format!("must not contain the delimiter {:?}", DELIMITER),
        ));
    }
    if value.contains(['\n', '\r']) {
        return Err(StoreError::invalid_field(field, "must not contain line breaks"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::directory::PriorityDirectory;
    use plansync_types::User;

    fn store_with_clock(clock: Arc<ManualClock>) -> RecordStore {
        let directory = PriorityDirectory::new(vec![
            User::new("admin", "password", 1),
            User::new("manager", "manage", 2),
            User::new("intern", "intern", 3),
            User::new("deputy", "deputy", 2),
        ]);
        RecordStore::new(Arc::new(directory)).with_clock(clock)
    }

    #[test]
    fn test_create_then_outrank() {
        let clock = Arc::new(ManualClock::new(1_000));
        let store = store_with_clock(clock.clone());

        let outcome = store.write("A", "x", &UserId::new("manager")).unwrap();
        assert_eq!(outcome, WriteOutcome::Created);

        clock.advance(10);
        let outcome = store.write("A", "y", &UserId::new("admin")).unwrap();
        assert_eq!(outcome, WriteOutcome::Updated);

        let record = store.get("A").unwrap();
        assert_eq!(record.data, "y");
        assert_eq!(record.owner, Some(UserId::new("admin")));
        assert_eq!(record.last_modified, Timestamp::from_secs(1_010));
    }

    #[test]
    fn test_equal_priority_keeps_incumbent() {
        let store = store_with_clock(Arc::new(ManualClock::new(5)));
        store.write("A", "x", &UserId::new("manager")).unwrap();

        let outcome = store.write("A", "y", &UserId::new("deputy")).unwrap();
        assert_eq!(outcome, WriteOutcome::Rejected);
        assert_eq!(store.get("A").unwrap().data, "x");
    }

    #[test]
    fn test_last_modified_never_moves_backwards() {
        let clock = Arc::new(ManualClock::new(500));
        let store = store_with_clock(clock.clone());
        store.write("A", "x", &UserId::new("manager")).unwrap();

        clock.set(100);
        store.write("A", "y", &UserId::new("admin")).unwrap();
        assert_eq!(store.get("A").unwrap().last_modified, Timestamp::from_secs(500));
    }

    #[test]
    fn test_invalid_fields_leave_store_untouched() {
        let store = store_with_clock(Arc::new(ManualClock::new(0)));
        let admin = UserId::new("admin");

        assert!(matches!(
            store.write("", "x", &admin),
            Err(StoreError::InvalidField { field: "id", .. })
        ));
        assert!(matches!(
            store.write("a,b", "x", &admin),
            Err(StoreError::InvalidField { field: "id", .. })
        ));
        assert!(matches!(
            store.write("A", "one,two", &admin),
            Err(StoreError::InvalidField { field: "data", .. })
        ));
        assert!(matches!(
            store.write("A", "line\nbreak", &admin),
            Err(StoreError::InvalidField { field: "data", .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unowned_record_yields_to_registered_writer() {
        let store = store_with_clock(Arc::new(ManualClock::new(0)));
        store.upsert_loaded(vec![(RecordId::new("A"), "old".into(), Timestamp::from_secs(1))]);

        assert_eq!(
            store.write("A", "new", &UserId::new("intern")).unwrap(),
            WriteOutcome::Updated
        );
        assert_eq!(
            store.write("B", "x", &UserId::new("stranger")).unwrap(),
            WriteOutcome::Created
        );
        store.upsert_loaded(vec![(RecordId::new("C"), "old".into(), Timestamp::from_secs(1))]);
        assert_eq!(
            store.write("C", "new", &UserId::new("stranger")).unwrap(),
            WriteOutcome::Rejected
        );
    }

    struct FailingBackup;

    impl BackupTarget for FailingBackup {
        fn write_snapshot(&mut self, _records: &[&Record]) -> CodecResult<()> {
            Err(plansync_error::CodecError::io(
                "write",
                "backup",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ))
        }
    }

    #[test]
    fn test_backup_failure_keeps_created_record() {
        let store = store_with_clock(Arc::new(ManualClock::new(0))).with_backup(FailingBackup);
        let err = store.write("A", "x", &UserId::new("admin")).unwrap_err();
        assert!(matches!(err, StoreError::BackupFailed { ref record_id, .. } if record_id == "A"));

        let record = store.get("A").unwrap();
        assert_eq!(record.owner, Some(UserId::new("admin")));
        assert_eq!(record.data, "x");
    }
}
