//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Default snapshot storage (LocalStorage on web, files on native)

use crate::persistence::SnapshotStore;

/// Directory used by the native file store when none is given
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_SAVE_DIR: &str = ".finger-football";

/// Install the logger. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install the logger (RUST_LOG overrides the default `info` level).
/// Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// LocalStorage, or an in-memory store when the browser has none
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn SnapshotStore> {
    use crate::persistence::{LocalStorageStore, MemoryStore};

    match LocalStorageStore::new() {
        Some(store) => Box::new(store),
        None => {
            log::warn!("LocalStorage unavailable, progress will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

/// File store under `dir`, or [`DEFAULT_SAVE_DIR`]
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store_in(dir: Option<std::path::PathBuf>) -> Box<dyn SnapshotStore> {
    use crate::persistence::FileStore;

    let dir = dir.unwrap_or_else(|| DEFAULT_SAVE_DIR.into());
    log::info!("Saving to {}", dir.display());
    Box::new(FileStore::new(dir))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn SnapshotStore> {
    default_store_in(None)
}
