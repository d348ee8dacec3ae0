//! Upload storage — persists the multipart file under the uploads directory
//! with a deterministic sanitised name.

use std::path::{Path, PathBuf};

use tracing::info;
use unicode_normalization::UnicodeNormalization;

use zapdrop_core::error::{Result, ZapdropError};

/// Sanitise an original upload name: whitespace becomes `_`, accents are
/// folded to their base letter, anything outside `[A-Za-z0-9._-]` is
/// dropped.
///
/// Two uploads sharing a sanitised name land on the same path; the later
/// write wins.
pub fn sanitize_filename(original: &str) -> String {
    let underscored: String = original
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    underscored
        .nfd()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Write `bytes` under `uploads_dir` using the sanitised `original_name`.
/// Returns the absolute path of the stored file.
pub fn store_upload(uploads_dir: &Path, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let name = sanitize_filename(original_name);
    if name.is_empty() {
        return Err(ZapdropError::Internal(format!(
            "upload name sanitised to nothing: {original_name:?}"
        )));
    }

    std::fs::create_dir_all(uploads_dir)?;
    let path = uploads_dir.join(name);
    std::fs::write(&path, bytes)?;

    // The stored file must be findable on disk before a schedule may be
    // registered against it.
    let absolute = path.canonicalize().map_err(|_| ZapdropError::UploadMissing {
        path: path.display().to_string(),
    })?;
    info!(path = %absolute.display(), bytes = bytes.len(), "upload stored");
    Ok(absolute)
}
