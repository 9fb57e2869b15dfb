//! Target list loading.
//!
//! The list is a JSON array of `{"url": ..., "type": "invidious" | "piped"}`;
//! `type` defaults to `invidious`. A missing file is fatal for the run.

use crate::core::probe::types::{RankerError, Target};
use crate::core::probe::url::validate_instance_url;
use std::path::Path;

/// Read and validate the target list
///
/// # Errors
///
/// * `RankerError::TargetsNotFound` - File does not exist; nothing may be probed
/// * `RankerError::TargetsReadError` - File exists but cannot be read
/// * `RankerError::TargetsParseError` - Malformed JSON, unknown type or bad URL
pub async fn load_targets(path: &Path) -> Result<Vec<Target>, RankerError> {
    if !path.exists() {
        return Err(RankerError::TargetsNotFound(path.to_path_buf()));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RankerError::TargetsReadError(format!("{}: {}", path.display(), e)))?;

    parse_targets(&content)
}

/// Parse target list JSON, stripping trailing slashes from every URL
pub fn parse_targets(content: &str) -> Result<Vec<Target>, RankerError> {
    let raw: Vec<Target> = serde_json::from_str(content)
        .map_err(|e| RankerError::TargetsParseError(e.to_string()))?;

    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let target = Target::new(&entry.url, entry.instance_type);
            if target.url.is_empty() {
                return Err(RankerError::TargetsParseError(format!(
                    "entry {}: empty url",
                    index
                )));
            }
            validate_instance_url(&target.url).map_err(|e| {
                RankerError::TargetsParseError(format!("entry {} ({}): {}", index, target.url, e))
            })?;
            Ok(target)
        })
        .collect()
}
