//! Append-only log store.
//!
//! Every mutation is appended to the log before memory changes, so
//! memory never holds an entry the log does not. A crash between the
//! two steps leaves at most one extra record, which replay absorbs.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::record::LogRecord;
use super::{KeyValueStore, StoreKey, StoreValue};
use crate::core::error::{Result, SiftError};

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every record was applied; the store is ready to serve.
    Completed { records: usize },
    /// Stopped early on request with partial state applied.
    Cancelled { records: usize },
}

impl ReplayOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ReplayOutcome::Completed { .. })
    }

    pub fn records(&self) -> usize {
        match self {
            ReplayOutcome::Completed { records } | ReplayOutcome::Cancelled { records } => *records,
        }
    }
}

const REPLAY_PROGRESS_EVERY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Replayed,
}

struct LogState<K, V> {
    file: File,
    items: HashMap<K, V>,
    phase: Phase,
}

/// Crash-recoverable key/value store backed by a JSON-lines log.
///
/// One instance owns its log file. Creates and deletes take the write
/// lock; reads take the read lock.
pub struct AppendLog<K, V> {
    path: PathBuf,
    sync_writes: bool,
    state: RwLock<LogState<K, V>>,
}

impl<K: StoreKey, V: StoreValue> AppendLog<K, V> {
    /// Open (or create) the log at `path`. Memory starts empty; call
    /// [`AppendLog::replay`] before serving.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        tracing::debug!(path = %path.display(), "Opened append log");

        Ok(Self {
            path,
            sync_writes: true,
            state: RwLock::new(LogState {
                file,
                items: HashMap::new(),
                phase: Phase::Open,
            }),
        })
    }

    /// Whether each append is flushed to stable storage before returning.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once a replay has run to completion.
    pub fn is_ready(&self) -> bool {
        self.state.read().phase == Phase::Replayed
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuild memory from the log, in file order.
    ///
    /// `cancel` is checked between records. A cancelled replay is not an
    /// error, but the store stays not ready.
    ///
    /// A final line without a newline is the residue of an interrupted
    /// append: it is applied if it parses and truncated away otherwise.
    /// Any other unparseable line is `CorruptData`.
    pub fn replay(&self, cancel: &AtomicBool) -> Result<ReplayOutcome> {
        let mut guard = self.state.write();
        let LogState { file, items, phase } = &mut *guard;

        items.clear();
        *phase = Phase::Open;
        file.seek(SeekFrom::Start(0))?;

        let mut reader = BufReader::new(&*file);
        let mut line = Vec::new();
        let mut offset = 0u64;
        let mut line_no = 0usize;
        let mut records = 0usize;
        let mut missing_newline = false;

        loop {
            if cancel.load(Ordering::Relaxed) {
                tracing::warn!(
                    path = %self.path.display(),
                    records,
                    "Replay cancelled"
                );
                return Ok(ReplayOutcome::Cancelled { records });
            }

            line.clear();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }
            line_no += 1;
            let terminated = line.last() == Some(&b'\n');
            let body = line.trim_ascii();

            if !body.is_empty() {
                match serde_json::from_slice::<LogRecord<K, V>>(body) {
                    Ok(record) => {
                        apply(items, record, line_no)?;
                        records += 1;
                        if records % REPLAY_PROGRESS_EVERY == 0 {
                            tracing::debug!(records, "Replay progress");
                        }
                        missing_newline = !terminated;
                    }
                    Err(err) if !terminated => {
                        tracing::warn!(
                            path = %self.path.display(),
                            line = line_no,
                            error = %err,
                            "Discarding torn record at end of log"
                        );
                        file.set_len(offset)?;
                        break;
                    }
                    Err(err) => {
                        return Err(SiftError::CorruptData(format!(
                            "{}: line {line_no}: {err}",
                            self.path.display()
                        )));
                    }
                }
            }
            offset += read as u64;
        }
        drop(reader);

        if missing_newline {
            let mut out: &File = file;
            out.write_all(b"\n")?;
        }

        *phase = Phase::Replayed;
        tracing::info!(
            path = %self.path.display(),
            records,
            live = items.len(),
            "Replayed append log"
        );
        Ok(ReplayOutcome::Completed { records })
    }

    fn append(&self, file: &File, record: &LogRecord<&K, &V>) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let offset = file.metadata()?.len();
        let mut out = file;
        let written = out.write_all(&line).and_then(|()| {
            if self.sync_writes {
                file.sync_data()
            } else {
                Ok(())
            }
        });

        if let Err(err) = written {
            // Keep later appends from landing after a partial line.
            if let Err(truncate_err) = file.set_len(offset) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %truncate_err,
                    "Failed to roll back partial append"
                );
            }
            return Err(err.into());
        }
        Ok(())
    }
}

fn apply<K: StoreKey, V>(
    items: &mut HashMap<K, V>,
    record: LogRecord<K, V>,
    line_no: usize,
) -> Result<()> {
    if record.is_deleted {
        items.remove(&record.key);
        return Ok(());
    }
    match record.value {
        Some(value) => {
            items.insert(record.key, value);
            Ok(())
        }
        None => Err(SiftError::CorruptData(format!(
            "line {line_no}: record for {} has no value",
            record.key
        ))),
    }
}

impl<K: StoreKey, V: StoreValue> KeyValueStore<K, V> for AppendLog<K, V> {
    fn create(&self, key: K, value: V) -> Result<()> {
        let mut state = self.state.write();
        if state.items.contains_key(&key) {
            return Err(SiftError::AlreadyExists(key.to_string()));
        }
        self.append(&state.file, &LogRecord::upsert(&key, &value))?;
        state.items.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &K) -> Result<V> {
        self.state
            .read()
            .items
            .get(key)
            .cloned()
            .ok_or_else(|| SiftError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &K) -> Result<()> {
        let mut state = self.state.write();
        if !state.items.contains_key(key) {
            return Err(SiftError::NotFound(key.to_string()));
        }
        self.append(&state.file, &LogRecord::<&K, &V>::tombstone(key))?;
        state.items.remove(key);
        Ok(())
    }

    fn all(&self) -> Vec<V> {
        self.state.read().items.values().cloned().collect()
    }
}
