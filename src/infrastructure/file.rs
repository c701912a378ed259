//! TOML snapshot store
//!
//! Loads the whole relation into a [`MemoryRowStore`] and writes it back on
//! [`TomlFileStore::flush`]. The write goes to a temp file in the target
//! directory and is renamed into place, so readers never see half a tree.
//!
//! Every snapshot carries a version. `flush` takes an exclusive lock on the
//! sidecar `<file>.lock`, re-reads the version on disk and refuses to write
//! when another process committed since this store was opened.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fd_lock::RwLock as FileLock;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

use crate::domain::{NewNode, NodeId, NodeRow};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::memory::MemoryRowStore;
use crate::infrastructure::traits::RowStore;

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    /// Bumped on every successful flush
    #[serde(default)]
    version: u64,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    rows: Vec<NodeRow>,
}

/// Only the version, for the pre-write check.
#[derive(Debug, Deserialize)]
struct SnapshotHeader {
    #[serde(default)]
    version: u64,
}

#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    inner: MemoryRowStore,
    /// Snapshot version this store was loaded from
    version: u64,
    dirty: bool,
}

impl TomlFileStore {
    /// Open the store at `path`; a missing file is an empty store.
    #[instrument(level = "debug")]
    pub fn open(path: &Path) -> InfraResult<Self> {
        let (inner, version) = match read_file(path)? {
            Some(content) => {
                let snapshot: Snapshot = parse(path, &content)?;
                debug!(
                    rows = snapshot.rows.len(),
                    version = snapshot.version,
                    "loaded store snapshot"
                );
                (
                    MemoryRowStore::from_parts(snapshot.next_id, snapshot.rows),
                    snapshot.version,
                )
            }
            None => {
                debug!("no store file yet, starting empty");
                (MemoryRowStore::new(), 0)
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            inner,
            version,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any mutation happened since open or the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Snapshot version on disk as of open or the last flush.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Persist the current rows if anything changed.
    ///
    /// Fails with [`InfraError::Conflict`] and writes nothing when the file
    /// was committed by someone else after this store loaded it.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn flush(&mut self) -> InfraResult<()> {
        if !self.dirty {
            return Ok(());
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;

        let lock_path = lock_path(&self.path);
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| InfraError::io(format!("open {}", lock_path.display()), e))?;
        let mut lock = FileLock::new(lock_file);
        let _guard = lock
            .write()
            .map_err(|e| InfraError::io(format!("lock {}", lock_path.display()), e))?;

        let on_disk = self.disk_version()?;
        if on_disk != self.version {
            warn!(expected = self.version, found = on_disk, "store changed since open");
            return Err(InfraError::Conflict {
                path: self.path.clone(),
                expected: self.version,
                found: on_disk,
            });
        }

        let snapshot = Snapshot {
            version: self.version + 1,
            next_id: self.inner.next_id(),
            rows: self.inner.all_ordered_by_left().map_err(|e| {
                InfraError::io(format!("snapshot {}", self.path.display()), e)
            })?,
        };
        let content = toml::to_string_pretty(&snapshot).map_err(|e| InfraError::Serialize {
            message: e.to_string(),
        })?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .map_err(|e| InfraError::io(format!("temp file in {}", dir.display()), e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| InfraError::io("write store snapshot", e))?;
        tmp.persist(&self.path)
            .map_err(|e| InfraError::io(format!("persist {}", self.path.display()), e.error))?;

        self.version = snapshot.version;
        self.dirty = false;
        debug!(rows = snapshot.rows.len(), version = self.version, "store flushed");
        Ok(())
    }

    fn disk_version(&self) -> InfraResult<u64> {
        Ok(match read_file(&self.path)? {
            Some(content) => parse::<SnapshotHeader>(&self.path, &content)?.version,
            None => 0,
        })
    }

    fn touched<T>(&mut self, result: io::Result<T>) -> io::Result<T> {
        if result.is_ok() {
            self.dirty = true;
        }
        result
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

/// File content, or None when there is no file yet.
fn read_file(path: &Path) -> InfraResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(InfraError::io(format!("read store {}", path.display()), e)),
    }
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> InfraResult<T> {
    toml::from_str(content).map_err(|e| InfraError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl RowStore for TomlFileStore {
    fn max_right(&self) -> io::Result<i64> {
        self.inner.max_right()
    }

    fn range_by_interval(&self, left: i64, right: i64) -> io::Result<Vec<NodeRow>> {
        self.inner.range_by_interval(left, right)
    }

    fn range_enclosing(&self, left: i64, right: i64) -> io::Result<Vec<NodeRow>> {
        self.inner.range_enclosing(left, right)
    }

    fn shift_left_where_left_greater_than(
        &mut self,
        boundary: i64,
        delta: i64,
    ) -> io::Result<usize> {
        let result = self.inner.shift_left_where_left_greater_than(boundary, delta);
        self.touched(result)
    }

    fn shift_right_where_right_greater_or_equal(
        &mut self,
        boundary: i64,
        delta: i64,
    ) -> io::Result<usize> {
        let result = self
            .inner
            .shift_right_where_right_greater_or_equal(boundary, delta);
        self.touched(result)
    }

    fn delete_where_nested_in(&mut self, left: i64, right: i64) -> io::Result<usize> {
        let result = self.inner.delete_where_nested_in(left, right);
        self.touched(result)
    }

    fn get_by_id(&self, id: NodeId) -> io::Result<Option<NodeRow>> {
        self.inner.get_by_id(id)
    }

    fn all_ordered_by_left(&self) -> io::Result<Vec<NodeRow>> {
        self.inner.all_ordered_by_left()
    }

    fn insert(&mut self, node: NewNode) -> io::Result<NodeRow> {
        let result = self.inner.insert(node);
        self.touched(result)
    }

    fn rename(&mut self, id: NodeId, name: &str) -> io::Result<Option<NodeRow>> {
        let result = self.inner.rename(id, name);
        self.touched(result)
    }
}
