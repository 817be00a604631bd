// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory detector backend for tests

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::types::{DetectError, DetectionLabel, ImageSource};
use super::LabelDetector;

/// Canned-response detector. Honors `max_labels` the way the real endpoint
/// does (truncates the relevance-ordered list).
pub struct MockLabelDetector {
    labels: Arc<Mutex<Vec<DetectionLabel>>>,
    injected_error: Arc<Mutex<Option<DetectError>>>,
    call_count: Arc<Mutex<u32>>,
}

impl MockLabelDetector {
    pub fn new() -> Self {
        Self::with_labels(Vec::new())
    }

    pub fn with_labels(labels: Vec<DetectionLabel>) -> Self {
        Self {
            labels: Arc::new(Mutex::new(labels)),
            injected_error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue an error to be returned by the next `detect_labels`.
    pub async fn inject_error(&self, error: DetectError) {
        let mut injected = self.injected_error.lock().await;
        *injected = Some(error);
    }

    pub async fn call_count(&self) -> u32 {
        *self.call_count.lock().await
    }
}

impl Default for MockLabelDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LabelDetector for MockLabelDetector {
    async fn detect_labels(
        &self,
        _image: ImageSource,
        max_labels: u32,
    ) -> Result<Vec<DetectionLabel>, DetectError> {
        *self.call_count.lock().await += 1;

        if let Some(error) = self.injected_error.lock().await.take() {
            return Err(error);
        }

        let labels = self.labels.lock().await;
        Ok(labels.iter().take(max_labels as usize).cloned().collect())
    }
}
