//! Defines routes for the web uploader.
//!
//! ## Structure
//! - `GET    /`                  — drag-and-drop upload page
//! - `GET    /gallery`           — uploaded videos with CDN URLs
//! - `POST   /upload`            — multipart upload (`file` field)
//! - `DELETE /delete/{filename}` — delete a video by destination name
//! - `GET    /config`            — configuration status as JSON

use crate::{
    handlers::video_handlers::{config_status, delete_video, gallery, index, upload_video},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

/// Build the router. `upload_limit` bounds the body of `POST /upload` only.
pub fn routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/gallery", get(gallery))
        .route(
            "/upload",
            post(upload_video).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/delete/{filename}", delete(delete_video))
        .route("/config", get(config_status))
}

/// Router with state attached, ready to serve.
pub fn build_router(state: AppState) -> Router {
    routes(state.upload_body_limit()).with_state(state)
}
