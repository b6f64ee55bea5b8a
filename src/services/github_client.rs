//! src/services/github_client.rs
//!
//! Remote content store backed by the GitHub Contents API. Every operation
//! is one HTTP round trip against `/repos/{account}/{repository}/contents/{videos_dir}`
//! with no retries; version conflicts are left to GitHub's `sha` precondition.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::{
    Client, Response, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{config::AppConfig, models::asset::RemoteAsset};

pub const USER_AGENT: &str = concat!("gh-video-cdn/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("writing `{name}` failed with status {status}: {body}")]
    Write {
        name: String,
        status: u16,
        body: String,
    },
    #[error("deleting `{name}` failed with status {status}")]
    Delete { name: String, status: u16 },
    #[error("remote request failed with status {status}: {body}")]
    Unexpected { status: u16, body: String },
    #[error("invalid API base url `{0}`")]
    InvalidUrl(String),
    #[error("token contains characters that cannot be sent in a header")]
    InvalidToken,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Operations the orchestrators need from the remote videos directory.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Metadata for one file, or `None` when it does not exist.
    async fn get(&self, name: &str) -> RemoteResult<Option<RemoteAsset>>;

    /// Create `name`, or replace the version identified by `prior_hash`.
    async fn put(&self, name: &str, contents: &[u8], prior_hash: Option<&str>)
    -> RemoteResult<()>;

    /// Delete the version of `name` identified by `hash`.
    async fn delete(&self, name: &str, hash: &str) -> RemoteResult<()>;

    /// Every file in the videos directory; empty when the directory is absent.
    async fn list(&self) -> RemoteResult<Vec<RemoteAsset>>;
}

/// Entry shape returned by `GET /contents/...`.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    size: u64,
    sha: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl From<ContentEntry> for RemoteAsset {
    fn from(entry: ContentEntry) -> Self {
        RemoteAsset {
            name: entry.name,
            size: entry.size,
            content_hash: entry.sha,
        }
    }
}

#[derive(Serialize)]
struct PutContentRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteContentRequest<'a> {
    message: String,
    sha: &'a str,
    branch: &'a str,
}

/// Authenticated client for one repository and branch.
#[derive(Clone)]
pub struct GithubContentClient {
    http: Client,
    api_base: Url,
    account: String,
    repository: String,
    branch: String,
    videos_dir: String,
}

impl GithubContentClient {
    pub fn new(config: &AppConfig) -> RemoteResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.credentials.token))
            .map_err(|_| RemoteError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let api_base = Url::parse(&config.api_base)
            .map_err(|_| RemoteError::InvalidUrl(config.api_base.clone()))?;
        if api_base.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(config.api_base.clone()));
        }

        Ok(Self {
            http,
            api_base,
            account: config.credentials.account.clone(),
            repository: config.credentials.repository.clone(),
            branch: config.branch.clone(),
            videos_dir: config.videos_dir.clone(),
        })
    }

    /// URL of the videos directory, or of `name` inside it.
    ///
    /// Segments are pushed individually so names are percent-encoded.
    fn contents_url(&self, name: Option<&str>) -> RemoteResult<Url> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RemoteError::InvalidUrl(self.api_base.to_string()))?;
            segments.pop_if_empty().extend([
                "repos",
                self.account.as_str(),
                self.repository.as_str(),
                "contents",
            ]);
            segments.extend(self.videos_dir.split('/').filter(|s| !s.is_empty()));
            if let Some(name) = name {
                segments.push(name);
            }
        }
        Ok(url)
    }
}

async fn unexpected(response: Response) -> RemoteError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    RemoteError::Unexpected { status, body }
}

#[async_trait]
impl ContentStore for GithubContentClient {
    async fn get(&self, name: &str) -> RemoteResult<Option<RemoteAsset>> {
        let url = self.contents_url(Some(name))?;
        debug!(%url, "fetching content metadata");

        let response = self
            .http
            .get(url)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let entry: ContentEntry = response.json().await?;
                Ok(Some(entry.into()))
            }
            _ => Err(unexpected(response).await),
        }
    }

    async fn put(
        &self,
        name: &str,
        contents: &[u8],
        prior_hash: Option<&str>,
    ) -> RemoteResult<()> {
        let url = self.contents_url(Some(name))?;
        let message = match prior_hash {
            Some(_) => format!("Update video: {}", name),
            None => format!("Add video: {}", name),
        };
        let body = PutContentRequest {
            message,
            content: general_purpose::STANDARD.encode(contents),
            branch: &self.branch,
            sha: prior_hash,
        };

        debug!(
            video = %name,
            size = contents.len(),
            update = prior_hash.is_some(),
            "putting content"
        );
        let response = self.http.put(url).json(&body).send().await?;

        let status = response.status();
        if status.is_success() {
            info!(video = %name, status = status.as_u16(), "content written");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Write {
            name: name.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn delete(&self, name: &str, hash: &str) -> RemoteResult<()> {
        let url = self.contents_url(Some(name))?;
        let body = DeleteContentRequest {
            message: format!("Delete video: {}", name),
            sha: hash,
            branch: &self.branch,
        };

        let response = self.http.delete(url).json(&body).send().await?;

        let status = response.status();
        if status.is_success() {
            info!(video = %name, "content deleted");
            Ok(())
        } else {
            Err(RemoteError::Delete {
                name: name.to_string(),
                status: status.as_u16(),
            })
        }
    }

    async fn list(&self) -> RemoteResult<Vec<RemoteAsset>> {
        let url = self.contents_url(None)?;
        debug!(%url, "listing videos directory");

        let response = self
            .http
            .get(url)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("videos directory does not exist yet");
                Ok(Vec::new())
            }
            status if status.is_success() => {
                let entries: Vec<ContentEntry> = response.json().await?;
                Ok(entries
                    .into_iter()
                    .filter(|entry| entry.kind.as_deref().is_none_or(|kind| kind == "file"))
                    .map(RemoteAsset::from)
                    .collect())
            }
            _ => Err(unexpected(response).await),
        }
    }
}
