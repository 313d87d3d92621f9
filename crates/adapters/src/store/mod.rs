// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence of schedule rules and resource state

mod json;

pub use json::JsonStoreAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStoreAdapter;

use async_trait::async_trait;
use simsched_core::{ResourceId, ResourceState};
use simsched_storage::{RuleRecord, StorageError};
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for rule and resource persistence
///
/// Rule rows are handed out raw; validation happens in the engine so one bad
/// row never hides the others.
#[async_trait]
pub trait StoreAdapter: Clone + Send + Sync + 'static {
    /// Rule rows for a resource and target state.
    ///
    /// Implementations may return extra rows (disabled, other resources);
    /// callers filter again.
    async fn rules_for(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
    ) -> Result<Vec<RuleRecord>, StoreError>;

    /// Whether any rule exists at all
    async fn has_rules(&self) -> Result<bool, StoreError>;

    /// All known resources in listing order
    async fn list_resources(&self) -> Result<Vec<ResourceState>, StoreError>;

    /// A single resource, `None` if it is gone
    async fn get_resource(&self, id: ResourceId) -> Result<Option<ResourceState>, StoreError>;

    async fn save_resource(&self, state: &ResourceState) -> Result<(), StoreError>;
}
