// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op activation adapter

use super::{ActivationAdapter, ActivationError};
use async_trait::async_trait;
use simsched_core::ResourceId;

/// Activation adapter that accepts every switch without doing anything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpActivationAdapter;

impl NoOpActivationAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActivationAdapter for NoOpActivationAdapter {
    async fn activate(
        &self,
        _resource_id: ResourceId,
        _enabled: bool,
        _keep_disabled: bool,
    ) -> Result<(), ActivationError> {
        Ok(())
    }
}
