// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label-detection endpoint client
//!
//! Detection, confidence scoring and inference are fully delegated to a
//! hosted service; this module only issues the request and gives the JSON
//! response a typed shape.

pub mod client;
pub mod mock;
pub mod types;

use async_trait::async_trait;

// Re-export main types for convenience
pub use client::HttpLabelDetector;
pub use mock::MockLabelDetector;
pub use types::{BoundingBoxInstance, DetectError, DetectionLabel, ImageSource};

/// Seam for the hosted detection endpoint. Exactly one image per call; no
/// pagination, streaming or batching.
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Returns detected labels in endpoint relevance order (not guaranteed
    /// stable between calls).
    async fn detect_labels(
        &self,
        image: ImageSource,
        max_labels: u32,
    ) -> Result<Vec<DetectionLabel>, DetectError>;
}
