// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access to stored unlock codes

mod command;

pub use command::CommandSecretStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSecretStoreAdapter, SecretCall};

use async_trait::async_trait;
use simsched_core::{ResourceId, Secret};
use thiserror::Error;

/// Errors from the secret store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("secret store is locked")]
    Locked,
    #[error("secret store error: {0}")]
    Backend(String),
}

/// Adapter for the encrypted secret store
#[async_trait]
pub trait SecretStoreAdapter: Clone + Send + Sync + 'static {
    /// Whether secrets can be decrypted right now
    async fn is_unlockable(&self) -> bool;

    /// Resources with a stored secret
    async fn list_pending(&self) -> Result<Vec<ResourceId>, SecretError>;

    async fn get(&self, id: ResourceId) -> Result<Option<Secret>, SecretError>;

    async fn is_marked_invalid(&self, id: ResourceId) -> Result<bool, SecretError>;

    /// Flag the stored secret as rejected by the SIM
    async fn mark_invalid(&self, id: ResourceId) -> Result<(), SecretError>;

    async fn mark_valid(&self, id: ResourceId) -> Result<(), SecretError>;
}

/// Secret store with nothing in it
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpSecretStoreAdapter;

impl NoOpSecretStoreAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecretStoreAdapter for NoOpSecretStoreAdapter {
    async fn is_unlockable(&self) -> bool {
        false
    }

    async fn list_pending(&self) -> Result<Vec<ResourceId>, SecretError> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: ResourceId) -> Result<Option<Secret>, SecretError> {
        Ok(None)
    }

    async fn is_marked_invalid(&self, _id: ResourceId) -> Result<bool, SecretError> {
        Ok(false)
    }

    async fn mark_invalid(&self, _id: ResourceId) -> Result<(), SecretError> {
        Ok(())
    }

    async fn mark_valid(&self, _id: ResourceId) -> Result<(), SecretError> {
        Ok(())
    }
}
