// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake activation adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ActivationAdapter, ActivationError};
use async_trait::async_trait;
use simsched_core::ResourceId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded activation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationCall {
    pub resource_id: ResourceId,
    pub enabled: bool,
    pub keep_disabled: bool,
}

#[derive(Default)]
struct FakeActivationState {
    calls: Vec<ActivationCall>,
    failures: HashMap<ResourceId, ActivationError>,
    delay: Option<Duration>,
}

/// Fake activation adapter with scripted failures
#[derive(Clone, Default)]
pub struct FakeActivationAdapter {
    state: Arc<Mutex<FakeActivationState>>,
}

impl FakeActivationAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeActivationState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ActivationCall> {
        self.lock().calls.clone()
    }

    /// Make every activation of `resource_id` fail with `error`
    pub fn fail_with(&self, resource_id: ResourceId, error: ActivationError) {
        self.lock().failures.insert(resource_id, error);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Sleep before answering, to exercise timeouts
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }
}

#[async_trait]
impl ActivationAdapter for FakeActivationAdapter {
    async fn activate(
        &self,
        resource_id: ResourceId,
        enabled: bool,
        keep_disabled: bool,
    ) -> Result<(), ActivationError> {
        let (delay, failure) = {
            let mut inner = self.lock();
            inner.calls.push(ActivationCall {
                resource_id,
                enabled,
                keep_disabled,
            });
            (inner.delay, inner.failures.get(&resource_id).cloned())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
