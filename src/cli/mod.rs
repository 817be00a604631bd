// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use ab_glyph::FontVec;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::EnvAuthenticator;
use crate::detector::HttpLabelDetector;
use crate::overlay::{OverlayOptions, OverlayRenderer};
use crate::pipeline::{run_once, RunRequest};
use crate::storage::HttpObjectStore;

/// Labelview CLI
#[derive(Parser, Debug)]
#[command(name = "labelview")]
#[command(version)]
#[command(about = "Fetch an image, run hosted label detection, draw the results", long_about = None)]
pub struct Cli {
    /// Object store bucket containing the image
    #[arg(long, env = "LABELVIEW_BUCKET")]
    pub bucket: String,

    /// Object key of the image inside the bucket
    #[arg(long, env = "LABELVIEW_KEY")]
    pub key: String,

    /// Maximum number of labels to request from the endpoint
    #[arg(long, env = "LABELVIEW_MAX_LABELS", default_value_t = 10)]
    pub max_labels: u32,

    /// Base URL of the S3-compatible object store
    #[arg(long, env = "LABELVIEW_STORE_ENDPOINT")]
    pub store_endpoint: String,

    /// URL of the label-detection endpoint
    #[arg(long, env = "LABELVIEW_DETECTOR_ENDPOINT")]
    pub detector_endpoint: String,

    /// Where to write the annotated image
    #[arg(long, env = "LABELVIEW_OUTPUT", default_value = "labeled.png")]
    pub output: PathBuf,

    /// TTF/OTF font for label text; rectangles are drawn without one
    #[arg(long, env = "LABELVIEW_FONT")]
    pub font: Option<PathBuf>,

    /// Send the fetched bytes to the endpoint instead of the store reference
    #[arg(long)]
    pub inline_bytes: bool,

    /// Clamp out-of-range bounding boxes instead of failing the run
    #[arg(long)]
    pub clamp_boxes: bool,
}

/// Execute a single-shot run from parsed arguments.
pub async fn execute(cli: Cli) -> Result<()> {
    let auth = Arc::new(EnvAuthenticator::from_env());
    if auth.is_anonymous() {
        info!("LABELVIEW_API_TOKEN unset; issuing anonymous requests");
    }

    let store = HttpObjectStore::new(&cli.store_endpoint, auth.clone())?;
    let detector = HttpLabelDetector::new(&cli.detector_endpoint, auth)?;

    let options = OverlayOptions {
        clamp_boxes: cli.clamp_boxes,
        ..OverlayOptions::default()
    };
    let mut renderer = OverlayRenderer::new(options);
    if let Some(path) = &cli.font {
        match load_font(path) {
            Some(font) => renderer = renderer.with_font(font),
            None => warn!("could not load font {}; label text disabled", path.display()),
        }
    }

    let request = RunRequest {
        bucket: cli.bucket,
        key: cli.key,
        max_labels: cli.max_labels,
        inline_bytes: cli.inline_bytes,
    };
    let report = run_once(&request, &store, &detector, &renderer).await?;

    print!("{}", report.summary);
    report
        .annotated
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!("annotated image written to {}", cli.output.display());
    Ok(())
}

fn load_font(path: &Path) -> Option<FontVec> {
    let bytes = std::fs::read(path).ok()?;
    FontVec::try_from_vec(bytes).ok()
}
