//! Versioned JSON envelope around every snapshot

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::StoreError;

/// Bump when a snapshot layout changes incompatibly
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

/// Only the version, so a newer layout can be rejected before parsing data
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Wrap `value` in a current-version envelope
pub fn encode<T: Serialize>(value: &T) -> Result<String, StoreError> {
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        data: value,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Unwrap a snapshot, rejecting other versions and malformed JSON
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T, StoreError> {
    let probe: VersionProbe = serde_json::from_str(json)?;
    if probe.version != SNAPSHOT_VERSION {
        return Err(StoreError::VersionMismatch {
            found: probe.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let envelope: Envelope<T> = serde_json::from_str(json)?;
    Ok(envelope.data)
}
