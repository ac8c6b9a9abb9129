//! File-backed capacity queue.
//!
//! Each class is persisted as a JSON-lines file (`class-<seats>.jsonl`) under a
//! data directory. The file is loaded on open. Every mutation is applied to a
//! copy of the table, written to a sibling temp file, synced, and renamed over
//! the live file; the in-memory table is replaced only after the rename, so
//! the file never holds a partial write. Only one process may own a data
//! directory.
//!
//! Disk work runs on the blocking pool behind an async writer gate, so a
//! stalled disk surfaces through the caller's round-trip timeout. A mutation
//! whose caller timed out may still be committed once the disk catches up.

use std::fs::{self, create_dir_all, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::memory::PositionTable;
use crate::core::{CapacityQueue, QueueEntry, Reposition, StoreError};
use crate::util::serde::{CapacityClass, Position, QueueId};

fn backend(err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Durable queue for one capacity class.
pub struct FileCapacityQueue {
    path: PathBuf,
    class: CapacityClass,
    table: Arc<Mutex<PositionTable>>,
    writer: Arc<tokio::sync::Mutex<()>>,
}

impl FileCapacityQueue {
    /// Open (or create) the queue file for `class` under `dir`.
    pub fn open(dir: impl AsRef<Path>, class: CapacityClass) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        create_dir_all(dir).map_err(backend)?;
        let path = dir.join(format!("class-{}.jsonl", class.seats()));
        let table = PositionTable::from_entries(class, Self::load(&path)?)?;
        tracing::debug!(%class, path = %path.display(), "file queue opened");
        Ok(Self {
            path,
            class,
            table: Arc::new(Mutex::new(table)),
            writer: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Vec<QueueEntry>, StoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(path).map_err(backend)?;
        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(backend)?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line).map_err(backend)?);
        }
        Ok(entries)
    }

    /// Temp file the next table image is written to before the rename.
    fn temp_path(path: &Path) -> PathBuf {
        path.with_extension("jsonl.tmp")
    }

    fn write_image(temp_path: &Path, table: &PositionTable) -> Result<(), StoreError> {
        let mut writer = BufWriter::new(File::create(temp_path).map_err(backend)?);
        for entry in table.snapshot() {
            let line = serde_json::to_string(&entry).map_err(backend)?;
            writeln!(writer, "{line}").map_err(backend)?;
        }
        let file = writer.into_inner().map_err(backend)?;
        file.sync_all().map_err(backend)
    }

    fn persist(path: &Path, table: &PositionTable) -> Result<(), StoreError> {
        let temp_path = Self::temp_path(path);
        if let Err(err) = Self::write_image(&temp_path, table) {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
        fs::rename(&temp_path, path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            backend(err)
        })
    }

    /// Apply a mutation to a copy of the table and persist it on the blocking
    /// pool. The live table only changes once the file has been replaced.
    async fn mutate<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PositionTable) -> Result<T, StoreError> + Send + 'static,
    {
        let gate = Arc::clone(&self.writer).lock_owned().await;
        let table = Arc::clone(&self.table);
        let path = self.path.clone();
        let class = self.class;

        tokio::task::spawn_blocking(move || {
            // Held until the write lands, even if the caller stops waiting.
            let _gate = gate;
            let mut next = table.lock().clone();
            let out = op(&mut next)?;
            if let Err(err) = Self::persist(&path, &next) {
                tracing::error!(%class, error = %err, "queue file write failed");
                return Err(err);
            }
            *table.lock() = next;
            Ok(out)
        })
        .await
        .map_err(backend)?
    }
}

#[async_trait]
impl CapacityQueue for FileCapacityQueue {
    fn capacity_class(&self) -> CapacityClass {
        self.class
    }

    async fn insert(&self, car_id: &str, position: Position) -> Result<QueueEntry, StoreError> {
        let car_id = car_id.to_owned();
        self.mutate(move |t| t.insert(&car_id, position)).await
    }

    async fn remove_by_queue_id(&self, queue_id: QueueId) -> Result<bool, StoreError> {
        self.mutate(move |t| Ok(t.remove(queue_id))).await
    }

    async fn snapshot(&self) -> Result<Vec<QueueEntry>, StoreError> {
        Ok(self.table.lock().snapshot())
    }

    async fn tail_position(&self) -> Result<Option<Position>, StoreError> {
        Ok(self.table.lock().tail())
    }

    async fn get(&self, queue_id: QueueId) -> Result<Option<QueueEntry>, StoreError> {
        Ok(self.table.lock().get(queue_id))
    }

    async fn find_car(&self, car_id: &str) -> Result<Option<QueueEntry>, StoreError> {
        Ok(self.table.lock().find_car(car_id))
    }

    async fn reposition(
        &self,
        queue_id: QueueId,
        position: Position,
    ) -> Result<Reposition, StoreError> {
        self.mutate(move |t| t.reposition(queue_id, position)).await
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        self.mutate(|t| Ok(t.clear())).await
    }
}
