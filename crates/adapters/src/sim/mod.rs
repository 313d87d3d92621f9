// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SIM lock status and secret delivery

mod command;
mod signal;

pub use command::CommandSimStatus;
pub use signal::{StatusSignal, StatusWatch};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSimStatusAdapter, SupplyCall};

use async_trait::async_trait;
use simsched_core::{ResourceId, Secret};
use thiserror::Error;

/// Errors from the SIM status service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimStatusError {
    #[error("sim service unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of handing a secret to the SIM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplyResult {
    Success,
    Incorrect,
    Unknown(String),
}

/// Adapter for SIM lock state
#[async_trait]
pub trait SimStatusAdapter: Clone + Send + Sync + 'static {
    /// Resources currently waiting for their unlock code
    async fn demanding_secret(&self) -> Result<Vec<ResourceId>, SimStatusError>;

    async fn remaining_attempts(&self, id: ResourceId) -> Result<u32, SimStatusError>;

    async fn supply_secret(
        &self,
        id: ResourceId,
        secret: &Secret,
    ) -> Result<SupplyResult, SimStatusError>;

    /// Signal raised whenever any SIM's lock state changes
    fn status_signal(&self) -> StatusSignal;
}

/// SIM service with no locked SIMs
#[derive(Clone, Default)]
pub struct NoOpSimStatusAdapter {
    signal: StatusSignal,
}

impl NoOpSimStatusAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SimStatusAdapter for NoOpSimStatusAdapter {
    async fn demanding_secret(&self) -> Result<Vec<ResourceId>, SimStatusError> {
        Ok(Vec::new())
    }

    async fn remaining_attempts(&self, _id: ResourceId) -> Result<u32, SimStatusError> {
        Ok(0)
    }

    async fn supply_secret(
        &self,
        _id: ResourceId,
        _secret: &Secret,
    ) -> Result<SupplyResult, SimStatusError> {
        Ok(SupplyResult::Unknown("no sim service".to_string()))
    }

    fn status_signal(&self) -> StatusSignal {
        self.signal.clone()
    }
}
