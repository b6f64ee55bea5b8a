//! Represents a video stored under the repository's videos directory.

use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Byte count expressed in mebibytes, the unit every size is displayed in.
pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// One stored video as reported by the remote store.
///
/// The CDN URL is derived from `name` on demand and never stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RemoteAsset {
    /// File name, unique within the videos directory.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// Version hash required to update or delete this exact version.
    pub content_hash: String,
}

impl RemoteAsset {
    pub fn size_mb(&self) -> f64 {
        megabytes(self.size)
    }

    /// First eight characters of the version hash, for display.
    pub fn short_hash(&self) -> &str {
        let end = self
            .content_hash
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.content_hash.len());
        &self.content_hash[..end]
    }
}
