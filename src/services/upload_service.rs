//! src/services/upload_service.rs
//!
//! UploadService — validates a local video, names it, pushes it to the
//! remote store and produces the CDN URL plus an HTML embed snippet.
//!
//! Each step is a hard gate: validation failures never reach the network,
//! and a failed put aborts before anything is written locally. The snippet
//! file is informational output; failing to write it does not fail the upload.

use bytes::Bytes;
use chrono::{Local, NaiveDateTime};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    models::{
        asset::megabytes,
        upload::{UploadOutcome, UploadRequest},
    },
    services::{
        cdn::{CdnAddress, html_snippet},
        github_client::{ContentStore, RemoteError},
        naming,
    },
};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error(
        "file too large: {:.1}MB ({size} bytes, max {max} bytes)",
        megabytes(*.size)
    )]
    FileTooLarge { size: u64, max: u64 },
    #[error("unsupported format `{extension}`; allowed: {}", .allowed.join(", "))]
    UnsupportedFormat {
        extension: String,
        allowed: Vec<String>,
    },
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn ContentStore>,
    config: Arc<AppConfig>,
    cdn: CdnAddress,
}

impl UploadService {
    pub fn new(store: Arc<dyn ContentStore>, config: Arc<AppConfig>) -> Self {
        let cdn = config.cdn();
        Self { store, config, cdn }
    }

    fn ensure_size(&self, size: u64) -> UploadResult<()> {
        if size > self.config.max_file_size {
            return Err(UploadError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }
        Ok(())
    }

    fn ensure_format(&self, name: &Path) -> UploadResult<()> {
        let extension = naming::extension_of(name).unwrap_or_default();
        if !self.config.is_allowed_extension(&extension) {
            return Err(UploadError::UnsupportedFormat {
                extension,
                allowed: self.config.allowed_extensions.clone(),
            });
        }
        Ok(())
    }

    /// Upload a file from disk (CLI path).
    pub async fn upload_file(&self, path: &Path) -> UploadResult<UploadOutcome> {
        let metadata = match fs::metadata(path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(UploadError::FileNotFound(path.to_path_buf())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(UploadError::FileNotFound(path.to_path_buf()));
            }
            Err(err) => return Err(UploadError::Io(err)),
        };
        self.ensure_size(metadata.len())?;
        self.ensure_format(path)?;

        let (destination_name, contents) = naming::derive_from_file(path, now()).await?;
        // The file may have grown between stat and read.
        self.ensure_size(contents.len() as u64)?;

        self.upload(UploadRequest {
            source: path.to_path_buf(),
            destination_name,
            contents,
        })
        .await
    }

    /// Upload an in-memory payload received by the web front end.
    pub async fn upload_bytes(
        &self,
        original_name: &str,
        contents: Bytes,
    ) -> UploadResult<UploadOutcome> {
        let source = Path::new(original_name);
        self.ensure_size(contents.len() as u64)?;
        self.ensure_format(source)?;

        self.upload(UploadRequest::new(source, contents, now()))
            .await
    }

    /// Remote half of the pipeline. `request.destination_name` is final here.
    pub(crate) async fn upload(&self, request: UploadRequest) -> UploadResult<UploadOutcome> {
        let name = request.destination_name.as_str();
        info!(
            source = %request.source.display(),
            video = %name,
            size = request.size(),
            "uploading video"
        );

        let existing = self.store.get(name).await?;
        if existing.is_some() {
            info!(video = %name, "video already exists, replacing it");
        }
        let prior_hash = existing.as_ref().map(|asset| asset.content_hash.as_str());

        self.store.put(name, &request.contents, prior_hash).await?;

        let cdn_url = self.cdn.url(name);
        let snippet_path = self.persist_snippet(name, &cdn_url).await;

        Ok(UploadOutcome {
            destination_name: request.destination_name.clone(),
            cdn_url,
            size_bytes: request.size(),
            updated: existing.is_some(),
            snippet_path,
        })
    }

    /// Write `<snippets_dir>/<name>.html`. Failures are logged, not returned.
    async fn persist_snippet(&self, name: &str, cdn_url: &str) -> Option<PathBuf> {
        let dir = &self.config.snippets_dir;
        let path = dir.join(format!("{}.html", name));
        let result = async {
            fs::create_dir_all(dir).await?;
            fs::write(&path, html_snippet(name, cdn_url)).await
        }
        .await;

        match result {
            Ok(()) => {
                debug!(path = %path.display(), "wrote html snippet");
                Some(path)
            }
            Err(err) => {
                warn!(path = %path.display(), "could not write html snippet: {}", err);
                None
            }
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
