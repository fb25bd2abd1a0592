// File-backed persistence
//
// Snapshots are written to a uniquely named temp file next to the target
// and renamed over it, so a crash or a concurrent save never publishes a
// partial file.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use plansync_error::{CodecError, CodecResult};
use plansync_types::Record;

use crate::codec::{self, LoadReport};
use crate::store::{BackupTarget, RecordStore};

/// Write a consistent snapshot of `store` to `path`.
pub fn save_to_path(store: &RecordStore, path: impl AsRef<Path>) -> CodecResult<usize> {
    let records = store.read_records();
    write_records(path.as_ref(), records.values())
}

/// Upsert the contents of the file at `path` into `store`.
///
/// A missing or unreadable file is an `Io` error and leaves the store
/// untouched; see [`CodecError::is_not_found`].
pub fn load_from_path(store: &RecordStore, path: impl AsRef<Path>) -> CodecResult<LoadReport> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let file = File::open(path).map_err(|e| CodecError::io("open", label.as_str(), e))?;
    let report = codec::load_from(store, BufReader::new(file), &label)?;
    info!(path = %label, loaded = report.loaded, skipped = report.skipped, "loaded floor plans");
    Ok(report)
}

fn write_records<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a Record>,
) -> CodecResult<usize> {
    let label = path.display().to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Each save gets its own temp file in the target's directory; it is
    // removed on drop if anything below fails.
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| CodecError::io("create", dir.display().to_string(), e))?;
    let count = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        codec::encode_to(records, &mut writer, &label)?
    };
    tmp.as_file()
        .sync_all()
        .map_err(|e| CodecError::io("sync", label.as_str(), e))?;

    tmp.persist(path)
        .map_err(|e| CodecError::io("rename", label.as_str(), e.error))?;
    debug!(path = %label, records = count, "snapshot written");
    Ok(count)
}

/// Backup target that rewrites a file with the full store on every creation.
#[derive(Debug, Clone)]
pub struct FileBackup {
    path: PathBuf,
}

impl FileBackup {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackupTarget for FileBackup {
    fn write_snapshot(&mut self, records: &[&Record]) -> CodecResult<()> {
        write_records(&self.path, records.iter().copied()).map(|_| ())
    }
}
