// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod object_store;

// Re-export main types for convenience
pub use object_store::{HttpObjectStore, MockObjectStore, ObjectStore, StorageError};
