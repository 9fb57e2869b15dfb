//! Snapshot persistence.
//!
//! The snapshot file is fully replaced on every run through a temp file and
//! rename, so readers never see a half-written array.

use crate::core::probe::types::{FleetSnapshot, RankerError};
use std::path::Path;

/// Write the ranked snapshot atomically using temp file + rename
pub async fn write_snapshot(path: &Path, snapshot: &FleetSnapshot) -> Result<(), RankerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RankerError::SnapshotError(format!("Failed to create directory: {}", e))
            })?;
        }
    }

    let content = serde_json::to_string_pretty(snapshot)
        .map_err(|e| RankerError::SnapshotError(format!("Failed to serialize snapshot: {}", e)))?;

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, content)
        .await
        .map_err(|e| RankerError::SnapshotError(format!("Failed to write temp file: {}", e)))?;

    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|e| RankerError::SnapshotError(format!("Failed to rename temp file: {}", e)))?;

    Ok(())
}

/// Load a previously written snapshot
pub async fn read_snapshot(path: &Path) -> Result<FleetSnapshot, RankerError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RankerError::SnapshotError(format!("Failed to read snapshot: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| RankerError::SnapshotError(format!("Failed to parse snapshot: {}", e)))
}
