//! Destination names for uploaded videos.
//!
//! A name is `{stem}_{YYYYMMDD_HHMMSS}_{md5[..8]}{ext}`: the original stem,
//! the upload time to the second, and the first eight hex characters of the
//! MD5 of the whole file. MD5 is a naming aid here, not an integrity check.

use bytes::Bytes;
use chrono::NaiveDateTime;
use std::{io, path::Path};
use tokio::fs;

use crate::services::upload_service::{UploadError, UploadResult};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const HASH_PREFIX_LEN: usize = 8;
const FALLBACK_STEM: &str = "video";

/// Pure name derivation from a source path, its contents and a timestamp.
pub fn destination_name(source: &Path, contents: &[u8], at: NaiveDateTime) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_STEM.to_string());
    let extension = extension_of(source)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    let digest = format!("{:x}", md5::compute(contents));

    format!(
        "{}_{}_{}{}",
        stem,
        at.format(TIMESTAMP_FORMAT),
        &digest[..HASH_PREFIX_LEN],
        extension
    )
}

/// Read a local file and derive its destination name.
///
/// Returns the contents alongside the name so the caller never reads the
/// file a second time.
pub async fn derive_from_file(path: &Path, at: NaiveDateTime) -> UploadResult<(String, Bytes)> {
    let contents = match fs::read(path).await {
        Ok(bytes) => Bytes::from(bytes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(UploadError::FileNotFound(path.to_path_buf()));
        }
        Err(err) => return Err(UploadError::Io(err)),
    };
    Ok((destination_name(path, &contents, at), contents))
}

/// Lowercased extension without the leading dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Reduce a client-supplied filename to something safe to use as a stem.
///
/// Keeps the last path component, turns whitespace into `_`, drops anything
/// outside `[A-Za-z0-9._-]` and strips leading dots and underscores.
pub fn sanitize_upload_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(raw);
    let cleaned: String = last
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let trimmed = cleaned.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
