//! Listing and deletion of uploaded videos.
//!
//! There is no local index: every call re-queries the remote store.
//! `delete` reads the current hash and then deletes that exact version; an
//! external change in between makes the remote reject the delete, and that
//! rejection is returned as-is.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::{
    models::asset::RemoteAsset,
    services::{
        cdn::CdnAddress,
        github_client::{ContentStore, RemoteError},
    },
};

#[derive(Debug, Error)]
pub enum ManageError {
    #[error("video `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A remote asset together with its derived CDN URL.
#[derive(Debug, Clone, Serialize)]
pub struct ListedVideo {
    #[serde(flatten)]
    pub asset: RemoteAsset,
    pub cdn_url: String,
}

#[derive(Clone)]
pub struct VideoManager {
    store: Arc<dyn ContentStore>,
    cdn: CdnAddress,
}

impl VideoManager {
    pub fn new(store: Arc<dyn ContentStore>, cdn: CdnAddress) -> Self {
        Self { store, cdn }
    }

    pub async fn list(&self) -> Result<Vec<ListedVideo>, ManageError> {
        let assets = self.store.list().await?;
        Ok(assets
            .into_iter()
            .map(|asset| ListedVideo {
                cdn_url: self.cdn.url(&asset.name),
                asset,
            })
            .collect())
    }

    /// Delete `name`, returning the metadata of the version that was removed.
    pub async fn delete(&self, name: &str) -> Result<RemoteAsset, ManageError> {
        let asset = self
            .store
            .get(name)
            .await?
            .ok_or_else(|| ManageError::NotFound(name.to_string()))?;

        self.store.delete(&asset.name, &asset.content_hash).await?;
        info!(video = %asset.name, "video deleted");
        Ok(asset)
    }

    /// CDN URL for `name`. Does not check that the video exists.
    pub fn url(&self, name: &str) -> String {
        self.cdn.url(name)
    }
}
