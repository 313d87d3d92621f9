// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Switching subscriptions on and off

mod command;
mod noop;
mod provider;

pub use command::CommandActivator;
pub use noop::NoOpActivationAdapter;
pub use provider::{Capabilities, SubscriptionProvider};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ActivationCall, FakeActivationAdapter};

use async_trait::async_trait;
use simsched_core::ResourceId;
use std::time::Duration;
use thiserror::Error;

/// Errors from activation operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("{0} not found")]
    NotFound(ResourceId),
    #[error("activation timed out after {0:?}")]
    Timeout(Duration),
    #[error("activation failed: {0}")]
    Failed(String),
}

/// Adapter for the platform call that enables or disables a subscription
#[async_trait]
pub trait ActivationAdapter: Clone + Send + Sync + 'static {
    /// Switch a subscription.
    ///
    /// `keep_disabled` asks the platform to keep a disabled subscription off
    /// across reboots; providers without that capability ignore it.
    async fn activate(
        &self,
        resource_id: ResourceId,
        enabled: bool,
        keep_disabled: bool,
    ) -> Result<(), ActivationError>;
}
