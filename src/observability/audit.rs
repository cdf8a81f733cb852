//! Audit journal
//!
//! Durable mirror of committed role change history:
//! - Append-only file, one record per line
//! - Each line is `<crc32 hex> <json>`, the checksum covering the JSON text
//! - A batch is written and fsynced before the transaction that produced it
//!   is merged into the directory
//!
//! The directory keeps its own in-memory history; the journal is never
//! replayed, only verified (`namhatta validate`).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::hierarchy::RoleChangeHistory;
use crate::observability::{Event, Logger};

/// Sink for committed history batches.
pub trait AuditJournal: Send + Sync {
    /// Append a batch of records.
    ///
    /// Must be durable when it returns `Ok`. An empty batch is a no-op.
    fn append_batch(&self, records: &[RoleChangeHistory]) -> io::Result<()>;
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "audit journal lock poisoned")
}

fn encode_line(record: &RoleChangeHistory) -> io::Result<String> {
    let json = serde_json::to_string(record)?;
    let checksum = crc32fast::hash(json.as_bytes());
    Ok(format!("{:08x} {}", checksum, json))
}

fn decode_line(line_no: usize, line: &str) -> io::Result<RoleChangeHistory> {
    let invalid = |msg: String| io::Error::new(io::ErrorKind::InvalidData, msg);

    let (checksum, json) = line
        .split_once(' ')
        .ok_or_else(|| invalid(format!("line {}: missing checksum", line_no)))?;
    let expected = u32::from_str_radix(checksum, 16)
        .map_err(|_| invalid(format!("line {}: malformed checksum", line_no)))?;
    if crc32fast::hash(json.as_bytes()) != expected {
        return Err(invalid(format!("line {}: checksum mismatch", line_no)));
    }

    serde_json::from_str(json).map_err(|e| invalid(format!("line {}: {}", line_no, e)))
}

/// Read and verify every record of a journal file, oldest first.
///
/// A missing file reads as empty. Blank lines are skipped.
pub fn read_journal(path: &Path) -> io::Result<Vec<RoleChangeHistory>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| decode_line(i + 1, line))
        .collect()
}

/// File-backed journal; fsync after every batch.
///
/// Writes go straight to the file. A batch that fails partway is cut back
/// off the end of the file, so a later batch never carries its lines.
pub struct FileAuditJournal {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditJournal {
    /// Open or create a journal file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file.lock().map_err(|_| poisoned())
    }

    #[cfg(test)]
    fn replace_file(&self, file: File) -> File {
        let mut guard = self.file.lock().unwrap();
        std::mem::replace(&mut *guard, file)
    }
}

impl AuditJournal for FileAuditJournal {
    fn append_batch(&self, records: &[RoleChangeHistory]) -> io::Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        // Encode everything first so a serialization failure writes nothing
        let mut batch = String::new();
        for record in records {
            batch.push_str(&encode_line(record)?);
            batch.push('\n');
        }

        let mut file = self.file()?;
        let start = file.metadata()?.len();

        let written = file.write_all(batch.as_bytes()).and_then(|_| file.sync_all());
        if let Err(e) = written {
            if let Err(cut) = file.set_len(start) {
                let error = cut.to_string();
                let shown = self.path.display().to_string();
                Logger::error(
                    Event::JournalAppendFailed.as_str(),
                    &[("path", shown.as_str()), ("truncate_error", error.as_str())],
                );
            }
            return Err(e);
        }

        Ok(())
    }
}

/// In-memory journal for tests and journal-less deployments.
#[derive(Debug, Default)]
pub struct MemoryAuditJournal {
    records: Mutex<Vec<RoleChangeHistory>>,
    fail_appends: bool,
}

impl MemoryAuditJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A journal whose appends always fail.
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_appends: true,
        }
    }

    /// All recorded entries, oldest first.
    pub fn records(&self) -> Vec<RoleChangeHistory> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditJournal for MemoryAuditJournal {
    fn append_batch(&self, records: &[RoleChangeHistory]) -> io::Result<()> {
        if self.fail_appends {
            return Err(io::Error::new(io::ErrorKind::Other, "journal unavailable"));
        }
        self.records
            .lock()
            .map_err(|_| poisoned())?
            .extend_from_slice(records);
        Ok(())
    }
}
