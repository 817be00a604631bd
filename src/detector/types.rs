// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for label detection

use serde::Deserialize;
use thiserror::Error;

/// One category detected in the image, with zero or more localized instances.
/// Zero instances means an image-level, non-localized detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionLabel {
    /// Category name as reported by the endpoint (e.g. "Person")
    pub name: String,
    /// Endpoint-reported certainty, 0-100
    pub confidence: f32,
    /// Localized occurrences, owned by this label
    pub instances: Vec<BoundingBoxInstance>,
}

/// Rectangle given as fractions of image width/height, not raw pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBoxInstance {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// What the detection request carries: a store reference or the raw bytes.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Bucket + key the endpoint reads from the store itself
    ObjectRef { bucket: String, key: String },
    /// Raw image bytes, base64-encoded on the wire
    Bytes(Vec<u8>),
}

/// Errors that can occur when calling the detection endpoint
#[derive(Debug, Error)]
pub enum DetectError {
    /// Endpoint unreachable or returned a non-success status
    #[error("Detection endpoint invocation failed: {0}")]
    Invocation(String),
    /// Request timed out at the transport layer
    #[error("Detection request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    /// Payload could not be parsed into the expected shape
    #[error("Malformed detection response: {0}")]
    MalformedResponse(String),
}

// --- Wire shape (endpoint-defined, PascalCase) ---

#[derive(Debug, Deserialize)]
struct DetectLabelsResponse {
    #[serde(rename = "Labels")]
    labels: Vec<WireLabel>,
}

#[derive(Debug, Deserialize)]
struct WireLabel {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Confidence")]
    confidence: f32,
    // Image-level labels come back without an Instances array at all
    #[serde(rename = "Instances", default)]
    instances: Vec<WireInstance>,
}

#[derive(Debug, Deserialize)]
struct WireInstance {
    #[serde(rename = "BoundingBox")]
    bounding_box: WireBoundingBox,
}

#[derive(Debug, Deserialize)]
struct WireBoundingBox {
    #[serde(rename = "Left")]
    left: f32,
    #[serde(rename = "Top")]
    top: f32,
    #[serde(rename = "Width")]
    width: f32,
    #[serde(rename = "Height")]
    height: f32,
}

/// Parse a raw endpoint payload into the typed model.
///
/// Shape mismatches fail loudly as `MalformedResponse`: missing required
/// fields are never defaulted, and a confidence outside [0,100] is treated
/// as a broken payload rather than silently kept.
pub fn parse_detect_labels(payload: &str) -> Result<Vec<DetectionLabel>, DetectError> {
    let response: DetectLabelsResponse = serde_json::from_str(payload)
        .map_err(|e| DetectError::MalformedResponse(e.to_string()))?;

    response
        .labels
        .into_iter()
        .map(|label| {
            if !(0.0..=100.0).contains(&label.confidence) {
                return Err(DetectError::MalformedResponse(format!(
                    "confidence {} for label '{}' is outside [0, 100]",
                    label.confidence, label.name
                )));
            }
            Ok(DetectionLabel {
                name: label.name,
                confidence: label.confidence,
                instances: label
                    .instances
                    .into_iter()
                    .map(|i| BoundingBoxInstance {
                        left: i.bounding_box.left,
                        top: i.bounding_box.top,
                        width: i.bounding_box.width,
                        height: i.bounding_box.height,
                    })
                    .collect(),
            })
        })
        .collect()
}
