//! In-memory `ContentStore` that records every call, for unit tests.

use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    models::asset::RemoteAsset,
    services::github_client::{ContentStore, RemoteError, RemoteResult},
};

#[derive(Default)]
pub struct RecordingStore {
    files: Mutex<BTreeMap<String, (Vec<u8>, String)>>,
    calls: AtomicUsize,
    pub last_prior_hash: Mutex<Option<String>>,
    write_failure: Mutex<Option<(u16, String)>>,
}

impl RecordingStore {
    pub fn with_file(name: &str, contents: &[u8]) -> Self {
        let store = Self::default();
        store.insert(name, contents);
        store
    }

    pub fn insert(&self, name: &str, contents: &[u8]) -> String {
        let sha = format!("{:x}", md5::compute(contents));
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), (contents.to_vec(), sha.clone()));
        sha
    }

    /// Make every later `put` fail with `status` and `body`.
    pub fn reject_writes(&self, status: u16, body: &str) {
        *self.write_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.lock().unwrap().contains_key(name)
    }

    fn asset(name: &str, contents: &[u8], sha: &str) -> RemoteAsset {
        RemoteAsset {
            name: name.to_string(),
            size: contents.len() as u64,
            content_hash: sha.to_string(),
        }
    }
}

#[async_trait]
impl ContentStore for RecordingStore {
    async fn get(&self, name: &str) -> RemoteResult<Option<RemoteAsset>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(name)
            .map(|(contents, sha)| Self::asset(name, contents, sha)))
    }

    async fn put(
        &self,
        name: &str,
        contents: &[u8],
        prior_hash: Option<&str>,
    ) -> RemoteResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prior_hash.lock().unwrap() = prior_hash.map(str::to_string);
        if let Some((status, body)) = self.write_failure.lock().unwrap().clone() {
            return Err(RemoteError::Write {
                name: name.to_string(),
                status,
                body,
            });
        }
        let current = self.files.lock().unwrap().get(name).map(|(_, sha)| sha.clone());
        if current.as_deref() != prior_hash {
            return Err(RemoteError::Write {
                name: name.to_string(),
                status: 409,
                body: "sha mismatch".into(),
            });
        }
        self.insert(name, contents);
        Ok(())
    }

    async fn delete(&self, name: &str, hash: &str) -> RemoteResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut files = self.files.lock().unwrap();
        match files.get(name) {
            Some((_, sha)) if sha == hash => {
                files.remove(name);
                Ok(())
            }
            Some(_) => Err(RemoteError::Delete {
                name: name.to_string(),
                status: 409,
            }),
            None => Err(RemoteError::Delete {
                name: name.to_string(),
                status: 404,
            }),
        }
    }

    async fn list(&self) -> RemoteResult<Vec<RemoteAsset>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|(name, (contents, sha))| Self::asset(name, contents, sha))
            .collect())
    }
}
