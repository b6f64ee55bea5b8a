//! Data carried between the remote store, the orchestrators and the
//! presentation layers.
//!
//! Nothing here is persisted locally; the repository on GitHub is the only
//! source of truth and every listing re-queries it.

pub mod asset;
pub mod upload;
