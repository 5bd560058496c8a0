//! Append-only per-symbol snapshot storage.
//!
//! Each symbol owns two files under the store directory: `<symbol>.snap`,
//! a flat sequence of fixed-width [`SnapshotRecord`]s, and `<symbol>.idx`,
//! a flat sequence of `(epoch, offset)` pairs giving the byte offset of
//! the matching `.snap` record. The index lets [`SnapshotStore::scan_range`]
//! binary-search its way to a starting point instead of scanning the whole
//! symbol history.
//!
//! A single process-wide lock covers the append-to-`.snap` then
//! append-to-`.idx` pair so a reader never observes an index entry whose
//! record hasn't landed yet, or vice versa. This mirrors the single mutex
//! guarding `AsyncJournal`'s writer thread in the teacher crate, except
//! here there is no background thread: callers append directly, serialized
//! by the lock.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::codec::{self, INDEX_ENTRY_SIZE, RECORD_SIZE};
use crate::errors::StoreError;
use crate::model::{IndexEntry, SnapshotRecord};

pub struct SnapshotStore {
    dir: PathBuf,
    append_lock: Mutex<()>,
}

impl SnapshotStore {
    /// Opens (creating if necessary) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            append_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snap_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.snap"))
    }

    fn idx_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.idx"))
    }

    /// Appends one snapshot for `symbol`, recording its offset in the
    /// companion index. Holds the append lock for the duration of both
    /// writes so the two files never drift out of sync under concurrent
    /// ingestion threads.
    pub fn append(&self, symbol: &str, record: &SnapshotRecord) -> Result<(), StoreError> {
        let _guard = self.append_lock.lock();

        let snap_path = self.snap_path(symbol);
        let mut snap_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&snap_path)
            .map_err(|source| StoreError::Open {
                path: snap_path.clone(),
                source,
            })?;
        let offset = snap_file
            .seek(SeekFrom::End(0))
            .map_err(|source| StoreError::Write {
                path: snap_path.clone(),
                source,
            })?;

        let bytes = codec::encode_record(record);
        snap_file
            .write_all(&bytes)
            .map_err(|source| StoreError::Write {
                path: snap_path.clone(),
                source,
            })?;

        let idx_path = self.idx_path(symbol);
        let mut idx_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&idx_path)
            .map_err(|source| StoreError::Open {
                path: idx_path.clone(),
                source,
            })?;
        let entry = IndexEntry {
            epoch: record.epoch,
            offset: offset as i64,
        };
        idx_file
            .write_all(&codec::encode_index_entry(&entry))
            .map_err(|source| StoreError::Write {
                path: idx_path,
                source,
            })?;

        Ok(())
    }

    /// Returns every persisted record for `symbol` with
    /// `start <= epoch <= end`, ascending. `start > end` yields an empty
    /// result rather than erroring — callers that want to reject inverted
    /// ranges check before calling (see `QueryEngine::query`).
    pub fn scan_range(
        &self,
        symbol: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<SnapshotRecord>, StoreError> {
        if start > end {
            return Ok(Vec::new());
        }

        let idx_path = self.idx_path(symbol);
        let index = match self.load_index(&idx_path) {
            Ok(index) => index,
            Err(StoreError::Open { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let start_pos = index.partition_point(|e| e.epoch < start);
        if start_pos >= index.len() {
            return Ok(Vec::new());
        }

        let snap_path = self.snap_path(symbol);
        let mut snap_file = File::open(&snap_path).map_err(|source| StoreError::Open {
            path: snap_path.clone(),
            source,
        })?;
        snap_file
            .seek(SeekFrom::Start(index[start_pos].offset as u64))
            .map_err(|source| StoreError::Read {
                path: snap_path.clone(),
                source,
            })?;

        let mut results = Vec::new();
        let mut buf = [0u8; RECORD_SIZE];
        for entry in &index[start_pos..] {
            if entry.epoch > end {
                break;
            }
            snap_file
                .read_exact(&mut buf)
                .map_err(|source| StoreError::Read {
                    path: snap_path.clone(),
                    source,
                })?;
            let record = codec::decode_record(&buf).map_err(|source| StoreError::Corrupt {
                path: snap_path.clone(),
                source,
            })?;
            results.push(record);
        }
        Ok(results)
    }

    fn load_index(&self, idx_path: &Path) -> Result<Vec<IndexEntry>, StoreError> {
        let mut file = File::open(idx_path).map_err(|source| StoreError::Open {
            path: idx_path.to_path_buf(),
            source,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| StoreError::Read {
                path: idx_path.to_path_buf(),
                source,
            })?;
        bytes
            .chunks_exact(INDEX_ENTRY_SIZE)
            .map(|chunk| {
                codec::decode_index_entry(chunk).map_err(|source| StoreError::Corrupt {
                    path: idx_path.to_path_buf(),
                    source,
                })
            })
            .collect()
    }
}
