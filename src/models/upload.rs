//! Transient upload values: the request built once per upload and the
//! outcome reported back to the CLI or the web client.

use bytes::Bytes;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::{models::asset::megabytes, services::naming};

/// A validated local payload plus the name it will be stored under.
///
/// The destination name is computed exactly once, here, and every later step
/// (existence check, put, URL, snippet) reads it from this struct.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub source: PathBuf,
    pub destination_name: String,
    pub contents: Bytes,
}

impl UploadRequest {
    pub fn new(source: &Path, contents: Bytes, at: NaiveDateTime) -> Self {
        let destination_name = naming::destination_name(source, &contents, at);
        Self {
            source: source.to_path_buf(),
            destination_name,
            contents,
        }
    }

    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub destination_name: String,
    pub cdn_url: String,
    pub size_bytes: u64,
    /// True when an object with the same name already existed and was replaced.
    pub updated: bool,
    /// Where the HTML snippet landed, if writing it succeeded.
    pub snippet_path: Option<PathBuf>,
}

impl UploadOutcome {
    /// Size in MB rounded to one decimal, as reported to web clients.
    pub fn size_mb_rounded(&self) -> f64 {
        (megabytes(self.size_bytes) * 10.0).round() / 10.0
    }
}
