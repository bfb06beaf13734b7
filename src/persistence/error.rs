use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Invalid snapshot key: {0:?}")]
    InvalidKey(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Errors that mean "the stored snapshot is unusable", as opposed to
    /// the store itself failing
    pub fn is_bad_snapshot(&self) -> bool {
        matches!(
            self,
            StoreError::Serialization(_) | StoreError::VersionMismatch { .. }
        )
    }
}
