//! Dispatch action types — shared between the scheduler engine and the
//! delivery layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stored as a JSON string in a job's action field.
///
/// Created by the registration endpoint when a schedule is accepted; parsed
/// by the delivery router in `zapdrop-gateway` when the scheduler fires the
/// job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchAction {
    /// Target chat names in registration order. Each is matched against the
    /// chat's display name or raw id at fire time, not at registration time.
    pub targets: Vec<String>,
    /// Caption sent alongside the attachment.
    pub caption: String,
    /// Absolute path of the stored upload. Deleted after the first firing.
    pub attachment: PathBuf,
}

impl DispatchAction {
    /// Split a comma-delimited target field into ordered names, dropping
    /// empty segments.
    pub fn parse_targets(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
