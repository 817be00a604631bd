// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod auth;
pub mod cli;
pub mod detector;
pub mod overlay;
pub mod pipeline;
pub mod storage;

// Re-export main types for convenience
pub use auth::{Authenticator, EnvAuthenticator, StaticAuthenticator};
pub use detector::{
    BoundingBoxInstance, DetectError, DetectionLabel, HttpLabelDetector, ImageSource,
    LabelDetector, MockLabelDetector,
};
pub use overlay::{summary, OverlayError, OverlayOptions, OverlayRenderer, PixelRect};
pub use pipeline::{run_once, RunReport, RunRequest};
pub use storage::{HttpObjectStore, MockObjectStore, ObjectStore, StorageError};
