//! Snapshot persistence
//!
//! Features:
//! - Pluggable key/value backends (memory, files, LocalStorage)
//! - Versioned JSON envelope
//! - Corrupt or foreign-version snapshots read as absent

pub mod envelope;
pub mod error;
pub mod store;

pub use envelope::{SNAPSHOT_VERSION, decode, encode};
pub use error::StoreError;
pub use store::{MemoryStore, SnapshotStore};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Saved league season
pub const KEY_LEAGUE: &str = "league";
/// Saved tournament bracket
pub const KEY_TOURNAMENT: &str = "tournament";
/// Player preferences
pub const KEY_SETTINGS: &str = "settings";

/// Read and decode the snapshot under `key`.
///
/// Missing, unreadable, corrupt and other-version snapshots all come back
/// as `None`; anything but "missing" is logged.
pub fn load_snapshot<T: DeserializeOwned>(store: &dyn SnapshotStore, key: &str) -> Option<T> {
    let json = match store.load(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Could not read {key} snapshot: {e}");
            return None;
        }
    };
    match decode(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding {key} snapshot: {e}");
            None
        }
    }
}

/// Encode `value` and store it under `key`
pub fn save_snapshot<T: Serialize>(
    store: &mut dyn SnapshotStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = encode(value)?;
    store.save(key, &json)
}
