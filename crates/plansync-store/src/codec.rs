//! Line-oriented persisted form of the record store.
//!
//! Each record is one line:
//!
//! ```text
//! <id>,<data>,<last_modified_unix_seconds>
//! ```
//!
//! There is no header and no escaping, so neither `id` nor `data` may
//! contain the delimiter or a line break. [`RecordStore::write`] enforces
//! that rule, which keeps anything the store holds round-trippable. Owners
//! are not written; a record restored from this form is unowned.
//!
//! Decoding splits a line on its first two delimiters. Lines with fewer
//! than two delimiters, an empty id, invalid UTF-8 or a non-integer
//! timestamp are skipped and counted rather than failing the load.

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use plansync_error::{CodecError, CodecResult};
use plansync_types::{Record, RecordId, Timestamp};

use crate::store::RecordStore;

/// Field separator of the persisted form.
pub const DELIMITER: char = ',';

/// Outcome of loading a persisted store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines applied to the store.
    pub loaded: usize,
    /// Malformed lines that were skipped.
    pub skipped: usize,
}

/// A decoded line before it is applied to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLine {
    pub id: RecordId,
    pub data: String,
    pub last_modified: Timestamp,
}

/// Format one record as a line, without the trailing newline.
pub fn encode_record(record: &Record) -> String {
    format!(
        "{}{d}{}{d}{}",
        record.id,
        record.data,
        record.last_modified.as_secs(),
        d = DELIMITER
    )
}

/// Parse one line (without its terminator).
pub fn parse_line(line: &str, line_number: usize) -> CodecResult<PersistedLine> {
    let mut parts = line.splitn(3, DELIMITER);
    let (id, data, timestamp) = match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(data), Some(ts)) => (id, data, ts),
        _ => return Err(CodecError::malformed(line_number, "fewer than two delimiters")),
    };
    if id.is_empty() {
        return Err(CodecError::malformed(line_number, "empty id"));
    }
    let secs: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| CodecError::malformed(line_number, format!("bad timestamp {:?}", timestamp)))?;

    Ok(PersistedLine {
        id: RecordId::new(id),
        data: data.to_string(),
        last_modified: Timestamp::from_secs(secs),
    })
}

/// Write `records` to `sink`, one line each. Returns the number written.
pub fn encode<'a, W: Write>(
    records: impl IntoIterator<Item = &'a Record>,
    sink: W,
) -> CodecResult<usize> {
    encode_to(records, sink, "sink")
}

pub(crate) fn encode_to<'a, W: Write>(
    records: impl IntoIterator<Item = &'a Record>,
    mut sink: W,
    target: &str,
) -> CodecResult<usize> {
    let mut count = 0;
    for record in records {
        writeln!(sink, "{}", encode_record(record))
            .map_err(|e| CodecError::io("write", target, e))?;
        count += 1;
    }
    sink.flush().map_err(|e| CodecError::io("flush", target, e))?;
    Ok(count)
}

/// Read every well-formed line from `source`, and count the skipped ones.
pub fn decode<R: BufRead>(source: R) -> CodecResult<(Vec<PersistedLine>, usize)> {
    decode_from(source, "source")
}

pub(crate) fn decode_from<R: BufRead>(
    mut source: R,
    target: &str,
) -> CodecResult<(Vec<PersistedLine>, usize)> {
    let mut lines = Vec::new();
    let mut skipped = 0;
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        let n = source
            .read_until(b'\n', &mut buf)
            .map_err(|e| CodecError::io("read", target, e))?;
        if n == 0 {
            break;
        }
        line_number += 1;

        let parsed = match std::str::from_utf8(&buf) {
            Ok(text) => parse_line(text.trim_end_matches(['\n', '\r']), line_number),
            Err(_) => Err(CodecError::malformed(line_number, "invalid UTF-8")),
        };
        match parsed {
            Ok(line) => lines.push(line),
            Err(err) => {
                warn!(input = %target, error = %err, "skipping persisted line");
                skipped += 1;
            }
        }
    }

    Ok((lines, skipped))
}

/// Write a consistent snapshot of `store` to `sink`.
///
/// The store's read lock is held while encoding, so no write can land
/// half-way through the output.
pub fn save<W: Write>(store: &RecordStore, sink: W) -> CodecResult<usize> {
    let records = store.read_records();
    let count = encode(records.values(), sink)?;
    debug!(records = count, "store saved");
    Ok(count)
}

/// Upsert every well-formed line of `source` into `store`.
///
/// Existing records are overwritten by id and nothing is removed. The
/// source is read completely before the store is touched, so a read error
/// leaves the store as it was.
pub fn load<R: BufRead>(store: &RecordStore, source: R) -> CodecResult<LoadReport> {
    load_from(store, source, "source")
}

pub(crate) fn load_from<R: BufRead>(
    store: &RecordStore,
    source: R,
    target: &str,
) -> CodecResult<LoadReport> {
    let (lines, skipped) = decode_from(source, target)?;
    let entries = lines
        .into_iter()
        .map(|line| (line.id, line.data, line.last_modified))
        .collect();
    let loaded = store.upsert_loaded(entries);
    debug!(input = %target, loaded, skipped, "store loaded");
    Ok(LoadReport { loaded, skipped })
}
