//! Explicitly constructed services shared by the CLI and the web front end.

use std::sync::Arc;

use crate::{
    config::{AppConfig, ConfigError, DEFAULT_MAX_FILE_SIZE},
    errors::AppError,
    services::{
        github_client::{ContentStore, GithubContentClient, RemoteResult},
        upload_service::UploadService,
        video_manager::VideoManager,
    },
};

/// One configuration and one authenticated client, wired into both
/// orchestrators.
#[derive(Clone)]
pub struct Backend {
    pub config: Arc<AppConfig>,
    pub uploads: UploadService,
    pub videos: VideoManager,
}

impl Backend {
    pub fn new(config: AppConfig, store: Arc<dyn ContentStore>) -> Self {
        let config = Arc::new(config);
        Self {
            uploads: UploadService::new(store.clone(), config.clone()),
            videos: VideoManager::new(store, config.cdn()),
            config,
        }
    }

    /// Build a backend talking to GitHub.
    pub fn connect(config: AppConfig) -> RemoteResult<Self> {
        let client = GithubContentClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }
}

/// Router state. The web server starts even without credentials so that
/// `/config` can explain what is missing.
#[derive(Clone)]
pub struct AppState {
    backend: Result<Backend, ConfigError>,
}

impl AppState {
    pub fn ready(backend: Backend) -> Self {
        Self {
            backend: Ok(backend),
        }
    }

    pub fn unconfigured(err: ConfigError) -> Self {
        Self { backend: Err(err) }
    }

    pub fn backend(&self) -> Result<&Backend, AppError> {
        self.backend
            .as_ref()
            .map_err(|err| AppError::from(err.clone()))
    }

    pub fn config_error(&self) -> Option<&ConfigError> {
        self.backend.as_ref().err()
    }

    /// Largest request body accepted on the upload route: the size cap plus
    /// room for multipart framing.
    pub fn upload_body_limit(&self) -> usize {
        let cap = self
            .backend
            .as_ref()
            .map(|b| b.config.max_file_size)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE);
        usize::try_from(cap)
            .unwrap_or(usize::MAX)
            .saturating_add(1024 * 1024)
    }
}
