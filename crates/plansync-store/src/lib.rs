// plansync record store
//
// The priority directory, the conflict-resolving record store, the
// line-oriented persisted form and the offline change queue.

pub mod clock;
pub mod codec;
pub mod directory;
pub mod file;
pub mod store;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{load, save, LoadReport, DELIMITER};
pub use directory::{PriorityDirectory, PriorityLookup};
pub use file::{load_from_path, save_to_path, FileBackup};
pub use store::{BackupTarget, RecordStore};
pub use sync::{synchronize, OfflineQueue, PendingChange, SyncEntry, SyncReport};
