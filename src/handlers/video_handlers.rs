//! HTTP handlers for the web uploader.
//! Uploads are buffered in memory (bounded by the route's body limit) and
//! handed to the same orchestrators the CLI uses.

use crate::{
    errors::AppError,
    handlers::pages,
    services::naming::sanitize_upload_name,
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse},
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub url: String,
    pub filename: String,
    pub size_mb: f64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// `GET /` — drag-and-drop upload page.
pub async fn index() -> Html<String> {
    Html(pages::upload_page())
}

/// `GET /gallery` — every uploaded video with its CDN URL.
pub async fn gallery(State(state): State<AppState>) -> Html<String> {
    let listing = match state.backend() {
        Ok(backend) => backend.videos.list().await.map_err(|err| err.to_string()),
        Err(err) => Err(err.message),
    };

    match listing {
        Ok(videos) => Html(pages::gallery_page(&videos, None)),
        Err(message) => {
            warn!("gallery listing failed: {}", message);
            Html(pages::gallery_page(&[], Some(&message)))
        }
    }
}

/// `POST /upload` — multipart upload of the `file` field.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let backend = state.backend()?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let raw_name = field.file_name().unwrap_or_default().to_string();
        let contents = field.bytes().await?;
        upload = Some((raw_name, contents));
        break;
    }

    let (raw_name, contents) = upload.ok_or_else(|| AppError::bad_request("no file selected"))?;
    let filename = sanitize_upload_name(&raw_name)
        .ok_or_else(|| AppError::bad_request("no file selected"))?;

    let outcome = backend.uploads.upload_bytes(&filename, contents).await?;
    let size_mb = outcome.size_mb_rounded();

    Ok(Json(UploadResponse {
        success: true,
        message: "video uploaded".into(),
        url: outcome.cdn_url,
        filename: outcome.destination_name,
        size_mb,
    }))
}

/// `DELETE /delete/{filename}`
pub async fn delete_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let backend = state.backend()?;
    let removed = backend.videos.delete(&filename).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("{} deleted", removed.name),
    }))
}

/// `GET /config` — whether credentials are present, without exposing the token.
pub async fn config_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.backend() {
        Ok(backend) => Json(json!({
            "configured": true,
            "username": backend.config.credentials.account,
            "repo": backend.config.credentials.repository,
        })),
        Err(_) => Json(json!({
            "configured": false,
            "error": state
                .config_error()
                .map(|err| err.to_string())
                .unwrap_or_default(),
        })),
    }
}
