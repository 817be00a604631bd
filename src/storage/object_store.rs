// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Read-only object store client
//!
//! The store grants `get` only; no write or delete capability is needed or
//! requested. The HTTP backend speaks the plain S3-compatible GET layout
//! (`{endpoint}/{bucket}/{key}`).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Authenticator;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
    #[error("Access denied: {bucket}/{key}")]
    AccessDenied { bucket: String, key: String },
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Read-only object store seam.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full byte content of `bucket`/`key`.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// One fetch attempt; transient failures are eligible for the single retry.
struct AttemptError {
    error: StorageError,
    transient: bool,
}

/// Object store client over HTTP.
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    auth: Arc<dyn Authenticator>,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str, auth: Arc<dyn Authenticator>) -> Result<Self, StorageError> {
        let parsed = Url::parse(endpoint)
            .map_err(|e| StorageError::Transport(format!("invalid store endpoint: {}", e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: parsed.as_str().trim_end_matches('/').to_string(),
            auth,
        })
    }

    async fn get_once(&self, bucket: &str, key: &str) -> Result<Vec<u8>, AttemptError> {
        let url = format!("{}/{}/{}", self.endpoint, bucket, key);
        let request = self.auth.authorize(self.client.get(&url));

        let response = request.send().await.map_err(|e| AttemptError {
            transient: e.is_timeout() || e.is_connect(),
            error: StorageError::Transport(e.to_string()),
        })?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => Err(AttemptError {
                error: StorageError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                },
                transient: false,
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AttemptError {
                error: StorageError::AccessDenied {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                },
                transient: false,
            }),
            s if !s.is_success() => Err(AttemptError {
                error: StorageError::Transport(format!("unexpected status {} from {}", s, url)),
                transient: s.is_server_error(),
            }),
            _ => {
                let bytes = response.bytes().await.map_err(|e| AttemptError {
                    error: StorageError::Transport(e.to_string()),
                    transient: true,
                })?;
                debug!("fetched {} bytes from {}", bytes.len(), url);
                Ok(bytes.to_vec())
            }
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        get_with_retry(bucket, key, || self.get_once(bucket, key)).await
    }
}

/// Retry policy: a transient failure gets exactly one more attempt, anything
/// else surfaces immediately.
async fn get_with_retry<F, Fut>(
    bucket: &str,
    key: &str,
    mut attempt: F,
) -> Result<Vec<u8>, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<u8>, AttemptError>>,
{
    match attempt().await {
        Ok(bytes) => Ok(bytes),
        Err(first) if first.transient => {
            warn!(
                "transient error fetching {}/{}: {}; retrying once",
                bucket, key, first.error
            );
            attempt().await.map_err(|a| a.error)
        }
        Err(first) => Err(first.error),
    }
}

/// In-memory store backend for tests.
pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
    injected_error: Arc<Mutex<Option<StorageError>>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            injected_error: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) {
        let mut objects = self.objects.lock().await;
        objects.insert((bucket.to_string(), key.to_string()), data);
    }

    /// Queue an error to be returned by the next `get`.
    pub async fn inject_error(&self, error: StorageError) {
        let mut injected = self.injected_error.lock().await;
        *injected = Some(error);
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        if let Some(error) = self.injected_error.lock().await.take() {
            return Err(error);
        }

        let objects = self.objects.lock().await;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}
