//! Fake GitHub Contents API served by axum on an ephemeral port.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::{Engine as _, engine::general_purpose};
use gh_video_cdn::config::{AppConfig, GithubCredentials};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{
    collections::BTreeMap,
    path::Path as FsPath,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

pub const TEST_TOKEN: &str = "ghp_test_token";
pub const ACCOUNT: &str = "alice";
pub const REPOSITORY: &str = "video-assets";

#[derive(Clone, Default)]
pub struct FakeGithub {
    files: Arc<Mutex<BTreeMap<String, StoredFile>>>,
    write_failure: Arc<Mutex<Option<StatusCode>>>,
}

#[derive(Clone)]
struct StoredFile {
    content: Vec<u8>,
    sha: String,
}

#[derive(Deserialize)]
struct PutBody {
    message: String,
    content: String,
    branch: String,
    sha: Option<String>,
}

#[derive(Deserialize)]
struct DeleteBody {
    message: String,
    sha: String,
    branch: String,
}

type FilePath = Path<(String, String, String, String)>;

impl FakeGithub {
    /// Start the fake and return its base URL.
    pub async fn spawn() -> (Self, String) {
        let fake = Self::default();
        let app = Router::new()
            .route("/repos/{owner}/{repo}/contents/{dir}", get(list_dir))
            .route(
                "/repos/{owner}/{repo}/contents/{dir}/{name}",
                get(get_file).put(put_file).delete(delete_file),
            )
            .layer(DefaultBodyLimit::disable())
            .with_state(fake.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (fake, format!("http://{}", addr))
    }

    pub fn insert(&self, name: &str, content: &[u8]) -> String {
        let sha = sha_of(content);
        self.files.lock().unwrap().insert(
            name.to_string(),
            StoredFile {
                content: content.to_vec(),
                sha: sha.clone(),
            },
        );
        sha
    }

    pub fn content(&self, name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(name)
            .map(|f| f.content.clone())
    }

    /// Answer every later PUT with `status`, as GitHub does for protected branches.
    pub fn reject_writes(&self, status: StatusCode) {
        *self.write_failure.lock().unwrap() = Some(status);
    }

    pub fn names(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

pub fn test_config(api_base: &str, snippets_dir: &FsPath) -> AppConfig {
    let mut cfg = AppConfig::new(GithubCredentials {
        token: TEST_TOKEN.into(),
        account: ACCOUNT.into(),
        repository: REPOSITORY.into(),
    });
    cfg.api_base = api_base.into();
    cfg.snippets_dir = snippets_dir.to_path_buf();
    cfg
}

fn sha_of(content: &[u8]) -> String {
    format!("{:x}", md5::compute(content))
}

fn entry(name: &str, file: &StoredFile) -> Value {
    json!({
        "type": "file",
        "name": name,
        "path": format!("videos/{}", name),
        "sha": file.sha,
        "size": file.content.len(),
    })
}

/// Mirrors GitHub: bearer token and a user agent are mandatory.
fn reject_unauthorized(headers: &HeaderMap) -> Option<Response> {
    let auth_ok = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {}", TEST_TOKEN)[..]);
    let agent_ok = headers.contains_key(header::USER_AGENT);
    if auth_ok && agent_ok {
        None
    } else {
        Some(message(StatusCode::UNAUTHORIZED, "Bad credentials"))
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn owned_repo(owner: &str, repo: &str) -> bool {
    owner == ACCOUNT && repo == REPOSITORY
}

async fn list_dir(
    State(fake): State<FakeGithub>,
    headers: HeaderMap,
    Path((owner, repo, dir)): Path<(String, String, String)>,
) -> Response {
    if let Some(resp) = reject_unauthorized(&headers) {
        return resp;
    }
    let files = fake.files.lock().unwrap();
    if !owned_repo(&owner, &repo) || dir != "videos" || files.is_empty() {
        return message(StatusCode::NOT_FOUND, "Not Found");
    }
    let entries: Vec<Value> = files.iter().map(|(n, f)| entry(n, f)).collect();
    Json(Value::Array(entries)).into_response()
}

async fn get_file(
    State(fake): State<FakeGithub>,
    headers: HeaderMap,
    Path((owner, repo, _dir, name)): FilePath,
) -> Response {
    if let Some(resp) = reject_unauthorized(&headers) {
        return resp;
    }
    let files = fake.files.lock().unwrap();
    match files.get(&name) {
        Some(file) if owned_repo(&owner, &repo) => Json(entry(&name, file)).into_response(),
        _ => message(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn put_file(
    State(fake): State<FakeGithub>,
    headers: HeaderMap,
    Path((_owner, _repo, _dir, name)): FilePath,
    Json(body): Json<PutBody>,
) -> Response {
    if let Some(resp) = reject_unauthorized(&headers) {
        return resp;
    }
    if let Some(status) = *fake.write_failure.lock().unwrap() {
        return message(status, "Repository rule violations found");
    }
    if body.message.is_empty() || body.branch != "main" {
        return message(StatusCode::UNPROCESSABLE_ENTITY, "Invalid request");
    }
    let Ok(content) = general_purpose::STANDARD.decode(body.content.as_bytes()) else {
        return message(StatusCode::UNPROCESSABLE_ENTITY, "content is not valid Base64");
    };

    let mut files = fake.files.lock().unwrap();
    let current_sha = files.get(&name).map(|f| f.sha.clone());
    let status = match (current_sha, body.sha.as_deref()) {
        (Some(_), None) => {
            return message(StatusCode::UNPROCESSABLE_ENTITY, "\"sha\" wasn't supplied.");
        }
        (Some(existing), Some(sha)) if existing != sha => {
            return message(StatusCode::CONFLICT, "sha does not match");
        }
        (Some(_), Some(_)) => StatusCode::OK,
        (None, _) => StatusCode::CREATED,
    };

    let file = StoredFile {
        sha: sha_of(&content),
        content,
    };
    let response = json!({ "content": entry(&name, &file) });
    files.insert(name, file);
    (status, Json(response)).into_response()
}

async fn delete_file(
    State(fake): State<FakeGithub>,
    headers: HeaderMap,
    Path((_owner, _repo, _dir, name)): FilePath,
    Json(body): Json<DeleteBody>,
) -> Response {
    if let Some(resp) = reject_unauthorized(&headers) {
        return resp;
    }
    if body.message.is_empty() || body.branch != "main" {
        return message(StatusCode::UNPROCESSABLE_ENTITY, "Invalid request");
    }
    let mut files = fake.files.lock().unwrap();
    let current_sha = files.get(&name).map(|f| f.sha.clone());
    match current_sha {
        None => message(StatusCode::NOT_FOUND, "Not Found"),
        Some(sha) if sha != body.sha => message(StatusCode::CONFLICT, "sha does not match"),
        Some(_) => {
            files.remove(&name);
            Json(json!({ "content": null })).into_response()
        }
    }
}
