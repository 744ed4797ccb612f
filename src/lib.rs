pub mod error;
pub mod geo;
pub mod model;
pub mod query;
pub mod server;
pub mod watcher;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::error::StoreError;
use crate::model::Record;

/// Store lifecycle: `Uninitialized` until the first successful reload,
/// `Loaded` from then on. A failed reload never moves it backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Loaded,
}

/// What a `reload()` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The file decoded; the snapshot was swapped for this many records.
    Replaced(usize),
    /// The file was absent or empty; the previous snapshot stands.
    Skipped,
}

/// In-memory mirror of one JSON snapshot file on disk.
///
/// The current snapshot is published behind an `Arc` swapped under a write
/// lock, so readers always hold one fully decoded version. Concurrent
/// reloads serialize on the lock; the last completed swap wins.
pub struct PropertyStore {
    path: PathBuf,
    snapshot: RwLock<Arc<Vec<Record>>>,
    loaded: AtomicBool,
}

impl PropertyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: RwLock::new(Arc::new(Vec::new())),
            loaded: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> StoreState {
        if self.loaded.load(Ordering::Acquire) {
            StoreState::Loaded
        } else {
            StoreState::Uninitialized
        }
    }

    /// The current snapshot. Cloning the `Arc` under the read lock means the
    /// returned view reflects exactly one completed reload, never a partial
    /// overwrite; a reload that finishes afterwards does not disturb it.
    pub fn current(&self) -> Arc<Vec<Record>> {
        self.snapshot.read().unwrap().clone()
    }

    /// Re-read and decode the snapshot file, atomically replacing the
    /// in-memory snapshot on success.
    ///
    /// An absent or zero-length file is a no-op. Undecodable contents
    /// return an error and leave the previous snapshot untouched: a corrupt
    /// write must never blank out previously good data.
    pub fn reload(&self) -> Result<ReloadOutcome, StoreError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(_) => return Ok(ReloadOutcome::Skipped),
        };
        if metadata.len() == 0 {
            return Ok(ReloadOutcome::Skipped);
        }

        let bytes = fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<Record> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;

        let count = records.len();
        {
            let mut guard = self.snapshot.write().unwrap();
            *guard = Arc::new(records);
        }
        self.loaded.store(true, Ordering::Release);
        Ok(ReloadOutcome::Replaced(count))
    }

    /// Modification time of the watched file, if it currently exists.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn store_in(dir: &tempfile::TempDir) -> PropertyStore {
        PropertyStore::new(dir.path().join("snapshot.json"))
    }

    #[test]
    fn starts_uninitialized_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.state(), StoreState::Uninitialized);
        assert!(store.current().is_empty());
    }

    #[test]
    fn missing_file_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.reload().unwrap(), ReloadOutcome::Skipped);
        assert_eq!(store.state(), StoreState::Uninitialized);
    }

    #[test]
    fn empty_file_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        File::create(store.path()).unwrap();
        assert_eq!(store.reload().unwrap(), ReloadOutcome::Skipped);
        assert!(store.current().is_empty());
    }

    #[test]
    fn reload_replaces_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"[{"latitude":40.0,"longitude":-74.0,"address":"a"}]"#,
        )
        .unwrap();

        assert_eq!(store.reload().unwrap(), ReloadOutcome::Replaced(1));
        assert_eq!(store.state(), StoreState::Loaded);
        assert_eq!(store.current()[0].latitude, 40.0);
    }

    #[test]
    fn reload_is_idempotent_without_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"[{"latitude":1.0,"longitude":2.0}]"#).unwrap();

        store.reload().unwrap();
        let first = store.current();
        store.reload().unwrap();
        let second = store.current();

        assert_eq!(*first, *second);
    }

    #[test]
    fn corrupt_file_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"[{"latitude":40.0,"longitude":-74.0}]"#).unwrap();
        store.reload().unwrap();

        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.reload(), Err(StoreError::Decode { .. })));

        // Stale but valid.
        assert_eq!(store.state(), StoreState::Loaded);
        assert_eq!(store.current().len(), 1);
        assert_eq!(store.current()[0].latitude, 40.0);
    }

    #[test]
    fn readers_keep_their_view_across_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"[{"latitude":1.0,"longitude":1.0}]"#).unwrap();
        store.reload().unwrap();

        let held = store.current();

        fs::write(
            store.path(),
            r#"[{"latitude":2.0,"longitude":2.0},{"latitude":3.0,"longitude":3.0}]"#,
        )
        .unwrap();
        store.reload().unwrap();

        // The old view is unchanged; the store serves the new one.
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].latitude, 1.0);
        assert_eq!(store.current().len(), 2);
    }

    #[test]
    fn one_bad_record_does_not_reject_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"[{"latitude":"TBD","longitude":-74.0},{"latitude":40.0,"longitude":-74.0}]"#,
        )
        .unwrap();

        assert_eq!(store.reload().unwrap(), ReloadOutcome::Replaced(2));
        assert!(store.current()[0].latitude.is_nan());
        assert_eq!(store.current()[1].latitude, 40.0);
    }
}
