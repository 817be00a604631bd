// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP client for the hosted label-detection endpoint

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::types::{parse_detect_labels, DetectError, DetectionLabel, ImageSource};
use super::LabelDetector;
use crate::auth::Authenticator;

const REQUEST_TIMEOUT_SECS: u64 = 30;

// --- Request serde structs ---

#[derive(serde::Serialize)]
struct DetectLabelsRequest {
    #[serde(rename = "Image")]
    image: ImagePayload,
    #[serde(rename = "MaxLabels")]
    max_labels: u32,
}

#[derive(serde::Serialize)]
struct ImagePayload {
    #[serde(rename = "S3Object", skip_serializing_if = "Option::is_none")]
    s3_object: Option<ObjectRefPayload>,
    #[serde(rename = "Bytes", skip_serializing_if = "Option::is_none")]
    bytes: Option<String>,
}

#[derive(serde::Serialize)]
struct ObjectRefPayload {
    #[serde(rename = "Bucket")]
    bucket: String,
    #[serde(rename = "Name")]
    name: String,
}

/// Client for the hosted detection endpoint.
pub struct HttpLabelDetector {
    client: Client,
    endpoint: String,
    auth: Arc<dyn Authenticator>,
}

impl HttpLabelDetector {
    pub fn new(endpoint: &str, auth: Arc<dyn Authenticator>) -> Result<Self, DetectError> {
        let parsed = Url::parse(endpoint)
            .map_err(|e| DetectError::Invocation(format!("invalid detector endpoint: {}", e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DetectError::Invocation(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: parsed.as_str().trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LabelDetector for HttpLabelDetector {
    async fn detect_labels(
        &self,
        image: ImageSource,
        max_labels: u32,
    ) -> Result<Vec<DetectionLabel>, DetectError> {
        let image = match image {
            ImageSource::ObjectRef { bucket, key } => ImagePayload {
                s3_object: Some(ObjectRefPayload {
                    bucket,
                    name: key,
                }),
                bytes: None,
            },
            ImageSource::Bytes(data) => ImagePayload {
                s3_object: None,
                bytes: Some(STANDARD.encode(data)),
            },
        };

        let request = DetectLabelsRequest { image, max_labels };

        let response = self
            .auth
            .authorize(self.client.post(&self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DetectError::Timeout {
                        timeout_ms: REQUEST_TIMEOUT_SECS * 1000,
                    }
                } else {
                    DetectError::Invocation(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DetectError::Invocation(format!(
                "status {}: {}",
                status, message
            )));
        }

        let payload = response
            .text()
            .await
            .map_err(|e| DetectError::Invocation(e.to_string()))?;

        let labels = parse_detect_labels(&payload)?;
        debug!("endpoint returned {} labels", labels.len());
        Ok(labels)
    }
}
