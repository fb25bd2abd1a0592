//! Running service
//!
//! Owns the priority directory, the record store and the room pool built
//! from a [`PlansyncConfig`]. Callers log in to get a [`Session`] and pass it
//! to every operation that writes on someone's behalf.

use std::sync::Arc;

use tracing::{info, warn};

use plansync_error::{Error, Result};
use plansync_rooms::RoomPool;
use plansync_store::{
    load_from_path, save_to_path, synchronize, Clock, FileBackup, LoadReport, OfflineQueue,
    PendingChange, PriorityDirectory, RecordStore, SyncReport, SystemClock,
};
use plansync_types::{Priority, Record, RoomId, UserId, WriteOutcome};

use crate::config::PlansyncConfig;

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: UserId,
    priority: Priority,
}

impl Session {
    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

#[derive(Debug)]
pub struct Service {
    config: PlansyncConfig,
    directory: Arc<PriorityDirectory>,
    store: Arc<RecordStore>,
    rooms: RoomPool,
    offline: OfflineQueue,
    startup: LoadReport,
}

impl Service {
    /// Build the service and load the primary file.
    ///
    /// A missing primary file is not an error: the service starts empty.
    pub fn start(config: PlansyncConfig) -> Result<Self> {
        Self::start_with_clock(config, Arc::new(SystemClock))
    }

    pub fn start_with_clock(config: PlansyncConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let directory = Arc::new(PriorityDirectory::new(config.roster()));
        let mut store = RecordStore::new(directory.clone()).with_clock(clock);
        if config.storage.backup_on_create {
            store = store.with_backup(FileBackup::new(&config.storage.backup_path));
        }
        let rooms = RoomPool::new(config.room_pool());

        let startup = match load_from_path(&store, &config.storage.primary_path) {
            Ok(report) => report,
            Err(err) if err.is_not_found() => {
                warn!(
                    path = %config.storage.primary_path.display(),
                    "primary file not found, starting empty"
                );
                LoadReport::default()
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            users = directory.len(),
            rooms = rooms.len(),
            records = store.len(),
            "service started"
        );

        Ok(Self {
            config,
            directory,
            store: Arc::new(store),
            rooms,
            offline: OfflineQueue::new(),
            startup,
        })
    }

    /// Check credentials against the directory.
    pub fn login(&self, identifier: &str, secret: &str) -> Result<Session> {
        if !self.directory.authenticate(identifier, secret) {
            warn!(user = identifier, "login failed");
            return Err(Error::AuthenticationFailed(identifier.to_string()));
        }
        let session = Session {
            user: UserId::new(identifier),
            priority: self.directory.priority_of(identifier),
        };
        info!(user = identifier, priority = %session.priority, "logged in");
        Ok(session)
    }

    /// Write a floor plan as the session's user.
    pub fn upload(&self, session: &Session, id: &str, data: &str) -> Result<WriteOutcome> {
        let outcome = self.store.write(id, data, &session.user)?;
        info!(record_id = id, user = %session.user, %outcome, "floor plan uploaded");
        Ok(outcome)
    }

    /// Queue a change made while offline. It is applied by [`Service::synchronize`].
    pub fn queue_offline(&self, session: &Session, id: &str, data: &str) {
        self.offline
            .push(PendingChange::new(id, data, session.user.clone()));
    }

    pub fn pending_offline(&self) -> usize {
        self.offline.len()
    }

    /// Replay every queued offline change, oldest first.
    ///
    /// `session` authorises running the replay and must belong to this
    /// service's directory. Each change is still written as the user who
    /// queued it, not as the session's user.
    pub fn synchronize(&self, session: &Session) -> Result<SyncReport> {
        let registered = self
            .directory
            .user(session.user.as_str())
            .map_or(false, |user| user.priority == session.priority);
        if !registered {
            warn!(user = %session.user, "sync refused for unknown session");
            return Err(Error::AuthenticationFailed(session.user.to_string()));
        }
        info!(
            triggered_by = %session.user,
            pending = self.offline.len(),
            "synchronizing offline changes"
        );
        Ok(synchronize(&self.store, &self.offline))
    }

    /// Reload the backup file into the live store.
    ///
    /// Records in the backup overwrite their in-memory counterparts by id;
    /// records absent from the backup are kept.
    pub fn recover_from_backup(&self) -> Result<LoadReport> {
        let path = &self.config.storage.backup_path;
        let report = load_from_path(&self.store, path)?;
        info!(
            path = %path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "recovered from backup"
        );
        Ok(report)
    }

    /// Write the whole store to the primary file.
    pub fn save_primary(&self) -> Result<usize> {
        Ok(save_to_path(&self.store, &self.config.storage.primary_path)?)
    }

    pub fn suggest_room(&self, required_capacity: u32) -> Option<RoomId> {
        self.rooms.best_fit_id(required_capacity)
    }

    pub fn get(&self, id: &str) -> Option<Record> {
        self.store.get(id)
    }

    /// What the primary file held when the service started.
    pub fn startup_report(&self) -> LoadReport {
        self.startup
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn directory(&self) -> &Arc<PriorityDirectory> {
        &self.directory
    }

    pub fn rooms(&self) -> &RoomPool {
        &self.rooms
    }

    pub fn config(&self) -> &PlansyncConfig {
        &self.config
    }
}
