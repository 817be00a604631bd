// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-shot orchestration: fetch -> decode -> detect -> render.
//!
//! Stateless; nothing survives the run. Every error is fatal and surfaced to
//! the caller immediately, which is the right shape for a one-shot tool.

use anyhow::{Context, Result};
use image::RgbImage;
use tracing::info;

use crate::detector::{DetectionLabel, ImageSource, LabelDetector};
use crate::overlay::{summary, OverlayRenderer};
use crate::storage::ObjectStore;

/// Flat parameter surface of a run: bucket, key, label cap and the choice of
/// sending the store reference or the raw bytes to the endpoint.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub bucket: String,
    pub key: String,
    pub max_labels: u32,
    pub inline_bytes: bool,
}

/// Everything a run produces, ready to save and print.
#[derive(Debug)]
pub struct RunReport {
    pub labels: Vec<DetectionLabel>,
    pub annotated: RgbImage,
    pub summary: String,
}

pub async fn run_once(
    request: &RunRequest,
    store: &dyn ObjectStore,
    detector: &dyn LabelDetector,
    renderer: &OverlayRenderer,
) -> Result<RunReport> {
    info!("fetching {}/{}", request.bucket, request.key);
    let bytes = store.get(&request.bucket, &request.key).await?;

    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("failed to decode {}/{}", request.bucket, request.key))?;
    let mut annotated = decoded.to_rgb8();
    info!(
        "decoded image {}x{} ({} bytes)",
        annotated.width(),
        annotated.height(),
        bytes.len()
    );

    let source = if request.inline_bytes {
        ImageSource::Bytes(bytes)
    } else {
        ImageSource::ObjectRef {
            bucket: request.bucket.clone(),
            key: request.key.clone(),
        }
    };

    let labels = detector.detect_labels(source, request.max_labels).await?;
    info!("detection endpoint returned {} labels", labels.len());

    renderer.render(&mut annotated, &labels)?;

    Ok(RunReport {
        summary: summary(&labels),
        labels,
        annotated,
    })
}
