// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake secret store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SecretError, SecretStoreAdapter};
use async_trait::async_trait;
use simsched_core::{ResourceId, Secret};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

/// Recorded flag change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretCall {
    MarkInvalid(ResourceId),
    MarkValid(ResourceId),
}

struct FakeSecretState {
    unlockable: bool,
    secrets: BTreeMap<ResourceId, Secret>,
    invalid: HashSet<ResourceId>,
    calls: Vec<SecretCall>,
}

/// In-memory secret store
#[derive(Clone)]
pub struct FakeSecretStoreAdapter {
    state: Arc<Mutex<FakeSecretState>>,
}

impl Default for FakeSecretStoreAdapter {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeSecretState {
                unlockable: true,
                secrets: BTreeMap::new(),
                invalid: HashSet::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeSecretStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeSecretState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(&self, id: ResourceId, secret: &str) {
        self.lock().secrets.insert(id, Secret::new(secret));
    }

    pub fn set_unlockable(&self, unlockable: bool) {
        self.lock().unlockable = unlockable;
    }

    /// Pre-flag a secret as rejected
    pub fn set_invalid(&self, id: ResourceId) {
        self.lock().invalid.insert(id);
    }

    pub fn is_invalid(&self, id: ResourceId) -> bool {
        self.lock().invalid.contains(&id)
    }

    /// Get all recorded flag changes
    pub fn calls(&self) -> Vec<SecretCall> {
        self.lock().calls.clone()
    }
}

#[async_trait]
impl SecretStoreAdapter for FakeSecretStoreAdapter {
    async fn is_unlockable(&self) -> bool {
        self.lock().unlockable
    }

    async fn list_pending(&self) -> Result<Vec<ResourceId>, SecretError> {
        let inner = self.lock();
        if !inner.unlockable {
            return Err(SecretError::Locked);
        }
        Ok(inner.secrets.keys().copied().collect())
    }

    async fn get(&self, id: ResourceId) -> Result<Option<Secret>, SecretError> {
        let inner = self.lock();
        if !inner.unlockable {
            return Err(SecretError::Locked);
        }
        Ok(inner.secrets.get(&id).cloned())
    }

    async fn is_marked_invalid(&self, id: ResourceId) -> Result<bool, SecretError> {
        Ok(self.lock().invalid.contains(&id))
    }

    async fn mark_invalid(&self, id: ResourceId) -> Result<(), SecretError> {
        let mut inner = self.lock();
        inner.invalid.insert(id);
        inner.calls.push(SecretCall::MarkInvalid(id));
        Ok(())
    }

    async fn mark_valid(&self, id: ResourceId) -> Result<(), SecretError> {
        let mut inner = self.lock();
        inner.invalid.remove(&id);
        inner.calls.push(SecretCall::MarkValid(id));
        Ok(())
    }
}
