//! Local key-value cache — the durable, synchronous draft-recovery store.
//!
//! The editor persists a small amount of resolution state between runs
//! (last opened document, unsaved draft text). The port is a plain
//! synchronous get/set/remove so it can be faked in tests; the production
//! implementation is a single JSON file in the user's data directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

/// Synchronous string key-value store. Writes are best-effort: a failed
/// flush loses draft recovery, not user data, so implementations log and
/// carry on rather than propagate.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-backed [`KvStore`]. The whole map is rewritten on every mutation;
/// the map holds four small keys, so this is cheaper than it sounds.
pub struct FileKvStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKvStore {
    /// Opens the store at `path`, loading any existing contents. A missing
    /// or corrupt file starts empty rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable cache file {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        let raw = match serde_json::to_string_pretty(entries) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize cache: {e}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        if let Err(e) = std::fs::write(&self.path, raw) {
            warn!("Failed to write cache file {}: {e}", self.path.display());
        }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory [`KvStore`] that counts `set` calls, for asserting on
    /// write coalescing in debounce tests.
    #[derive(Default)]
    pub struct MemoryKvStore {
        entries: Mutex<BTreeMap<String, String>>,
        writes: AtomicUsize,
    }

    impl MemoryKvStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KvStore for MemoryKvStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.entries.lock().unwrap().remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileKvStore::open(&path);
        store.set("filename", "my_resume.tex");
        store.set("source", "draft");
        drop(store);

        let reopened = FileKvStore::open(&path);
        assert_eq!(reopened.get("filename").as_deref(), Some("my_resume.tex"));
        assert_eq!(reopened.get("source").as_deref(), Some("draft"));
    }

    #[test]
    fn test_remove_deletes_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("state.json"));
        store.set("content", "\\documentclass{article}");
        store.remove("content");
        assert_eq!(store.get("content"), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileKvStore::open(&path);
        assert_eq!(store.get("filename"), None);
    }

    #[test]
    fn test_missing_parent_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/state.json");
        let store = FileKvStore::open(&path);
        store.set("path", "/home/u/resume.tex");
        assert!(path.exists());
    }
}
