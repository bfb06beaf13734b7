//! Key/value snapshot backends

use std::collections::HashMap;

use super::error::StoreError;

/// A string-keyed store of serialized snapshots
pub trait SnapshotStore {
    /// `Ok(None)` when nothing is stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, snapshot: &str) -> Result<(), StoreError>;
    /// Removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Keys become file names, so keep them to a safe alphabet
fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Volatile store, for tests and when no real backend exists
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, snapshot: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.entries.insert(key.to_string(), snapshot.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{SnapshotStore, StoreError, check_key};

    /// One `<key>.json` file per snapshot in a directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        /// The directory is created on first save
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl SnapshotStore for FileStore {
        fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
            check_key(key)?;
            match fs::read_to_string(self.path(key)) {
                Ok(json) => Ok(Some(json)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        /// Written to a temp file first, then renamed over the old snapshot
        fn save(&mut self, key: &str, snapshot: &str) -> Result<(), StoreError> {
            check_key(key)?;
            fs::create_dir_all(&self.dir)?;
            let path = self.path(key);
            let tmp = self.dir.join(format!("{key}.json.tmp"));
            fs::write(&tmp, snapshot)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            check_key(key)?;
            match fs::remove_file(self.path(key)) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use super::{SnapshotStore, StoreError, check_key};

    const KEY_PREFIX: &str = "finger_football_";

    /// Browser LocalStorage, keys prefixed per app
    pub struct LocalStorageStore {
        storage: web_sys::Storage,
    }

    impl LocalStorageStore {
        /// `None` when the browser exposes no LocalStorage (e.g. privacy mode)
        pub fn new() -> Option<Self> {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()?;
            Some(Self { storage })
        }

        fn item(key: &str) -> String {
            format!("{KEY_PREFIX}{key}")
        }
    }

    fn js_error(op: &str) -> StoreError {
        StoreError::Unavailable(format!("LocalStorage {op} failed"))
    }

    impl SnapshotStore for LocalStorageStore {
        fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
            check_key(key)?;
            self.storage
                .get_item(&Self::item(key))
                .map_err(|_| js_error("read"))
        }

        fn save(&mut self, key: &str, snapshot: &str) -> Result<(), StoreError> {
            check_key(key)?;
            self.storage
                .set_item(&Self::item(key), snapshot)
                .map_err(|_| js_error("write"))
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            check_key(key)?;
            self.storage
                .remove_item(&Self::item(key))
                .map_err(|_| js_error("remove"))
        }
    }
}
