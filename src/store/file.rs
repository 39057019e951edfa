// src/store/file.rs
//! JSON-snapshot score store with scoped sessions.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::memory::{MemoryStore, Snapshot};
use super::{Aggregation, ScoreStore, ScoredPair};
use crate::error::{LinkError, Result};
use crate::link::{LinkKind, MetricKind};

/// A [`MemoryStore`] loaded from, and written back to, one JSON file.
///
/// Prefer [`with_store`], which guarantees the session is closed.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
    dirty: bool,
}

impl FileStore {
    /// Loads the snapshot at `path`; a missing file opens an empty store.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the file cannot be read or is corrupt.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = match fs::read_to_string(path) {
            Ok(content) => {
                let snapshot: Snapshot = serde_json::from_str(&content).map_err(|e| {
                    LinkError::StoreUnavailable(format!("corrupt snapshot {}: {e}", path.display()))
                })?;
                MemoryStore::from_snapshot(snapshot)?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => MemoryStore::new(),
            Err(e) => {
                return Err(LinkError::StoreUnavailable(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };
        debug!(path = %path.display(), "store session opened");
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            dirty: false,
        })
    }

    /// Read-only view of the loaded contents.
    #[must_use]
    pub fn contents(&self) -> &MemoryStore {
        &self.inner
    }

    /// Ends the session, writing the snapshot back if anything changed.
    ///
    /// # Errors
    /// Returns `Io` if the snapshot cannot be written.
    pub fn close(self) -> Result<()> {
        if self.dirty {
            let content = serde_json::to_string_pretty(&self.inner.snapshot())?;
            atomic_write(&self.path, &content)?;
            debug!(path = %self.path.display(), "store snapshot written");
        }
        debug!(path = %self.path.display(), "store session closed");
        Ok(())
    }
}

/// Opens the store at `path`, runs `f`, and closes the session on every exit
/// path. Writes made before a failure inside `f` are still persisted; the
/// closure's error is returned in preference to a close error.
///
/// # Errors
/// Returns the error of `open`, of `f`, or of `close`, in that priority.
pub fn with_store<T, F>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&mut FileStore) -> Result<T>,
{
    let mut store = FileStore::open(path)?;
    let outcome = f(&mut store);
    let closed = store.close();
    match outcome {
        Ok(value) => closed.map(|()| value),
        Err(e) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "store close failed after an earlier error");
            }
            Err(e)
        }
    }
}

fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LinkError::io(e, parent))?;
    }
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(|e| LinkError::io(e, &temp_path))?;
    fs::rename(&temp_path, path).map_err(|e| LinkError::io(e, path))?;
    Ok(())
}

impl ScoreStore for FileStore {
    fn score(&self, metric: MetricKind, u: u64, v: u64) -> Result<Option<f64>> {
        self.inner.score(metric, u, v)
    }

    fn top_k(&self, metric: MetricKind, k: usize) -> Result<Vec<ScoredPair>> {
        self.inner.top_k(metric, k)
    }

    fn exists(&self, kind: LinkKind, u: u64, v: u64, weight: f64) -> Result<bool> {
        self.inner.exists(kind, u, v, weight)
    }

    fn count_edges(&self) -> Result<usize> {
        self.inner.count_edges()
    }

    fn put(
        &mut self,
        kind: LinkKind,
        u: u64,
        v: u64,
        weight: f64,
        policy: Aggregation,
    ) -> Result<()> {
        self.inner.put(kind, u, v, weight, policy)?;
        self.dirty = true;
        Ok(())
    }

    fn remove(&mut self, u: u64, v: u64, kind: LinkKind) -> Result<bool> {
        let removed = self.inner.remove(u, v, kind)?;
        self.dirty |= removed;
        Ok(removed)
    }

    fn clear_all(&mut self) -> Result<()> {
        self.inner.clear_all()?;
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const NTA: LinkKind = LinkKind::Mined(MetricKind::Nta);

    #[test]
    fn missing_file_opens_empty_and_is_not_created_by_reads() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("store.json");
        let count = with_store(&path, |store| store.count_edges())?;
        assert_eq!(count, 0);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn writes_persist_across_sessions() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("store.json");
        with_store(&path, |store| {
            store.put(LinkKind::Real, 1, 2, 2.0, Aggregation::RunningAverage)?;
            store.put(LinkKind::Real, 2, 1, 4.0, Aggregation::RunningAverage)?;
            store.put(NTA, 3, 4, 0.5, Aggregation::Overwrite)
        })?;

        let (real, score) = with_store(&path, |store| {
            Ok((
                store.contents().real_entry(1, 2),
                store.score(MetricKind::Nta, 4, 3)?,
            ))
        })?;
        assert_eq!(real, Some((3.0, 2)));
        assert_eq!(score, Some(0.5));
        assert!(!path.with_extension("json.tmp").exists());
        Ok(())
    }

    #[test]
    fn failing_closure_still_persists_earlier_writes() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("store.json");
        let outcome: Result<()> = with_store(&path, |store| {
            store.put(NTA, 1, 2, 0.9, Aggregation::Overwrite)?;
            Err(LinkError::InvalidParameter("boom".into()))
        });
        assert!(matches!(outcome, Err(LinkError::InvalidParameter(_))));

        let score = with_store(&path, |store| store.score(MetricKind::Nta, 1, 2))?;
        assert_eq!(score, Some(0.9));
        Ok(())
    }

    #[test]
    fn corrupt_snapshot_is_store_unavailable() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json")?;
        assert!(matches!(
            FileStore::open(&path),
            Err(LinkError::StoreUnavailable(_))
        ));
        Ok(())
    }
}
