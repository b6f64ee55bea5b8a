use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{
    config::ConfigError,
    services::{
        github_client::RemoteError, upload_service::UploadError, video_manager::ManageError,
    },
};

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        tracing::error!("remote store error: {}", err);
        AppError::new(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::FileNotFound(_) | UploadError::UnsupportedFormat { .. } => {
                AppError::bad_request(err.to_string())
            }
            UploadError::FileTooLarge { .. } => {
                AppError::new(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
            }
            UploadError::Remote(remote) => remote.into(),
            UploadError::Io(io) => AppError::internal(io.to_string()),
        }
    }
}

impl From<ManageError> for AppError {
    fn from(err: ManageError) -> Self {
        match err {
            ManageError::NotFound(_) => AppError::not_found(err.to_string()),
            ManageError::Remote(remote) => remote.into(),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::new(err.status(), err.body_text())
    }
}
