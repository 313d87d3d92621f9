// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability-selected activation provider

use super::{ActivationAdapter, ActivationError};
use async_trait::async_trait;
use simsched_core::ResourceId;

/// What the platform's activation call supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The platform can keep a disabled subscription off across reboots
    pub persistent_disable: bool,
}

/// Activation provider chosen once from a capability probe
#[derive(Debug, Clone)]
pub enum SubscriptionProvider<M, L> {
    Modern(M),
    Legacy(L),
}

impl<M, L> SubscriptionProvider<M, L> {
    pub fn select(caps: Capabilities, modern: M, legacy: L) -> Self {
        if caps.persistent_disable {
            SubscriptionProvider::Modern(modern)
        } else {
            SubscriptionProvider::Legacy(legacy)
        }
    }

    pub fn is_modern(&self) -> bool {
        matches!(self, SubscriptionProvider::Modern(_))
    }
}

#[async_trait]
impl<M, L> ActivationAdapter for SubscriptionProvider<M, L>
where
    M: ActivationAdapter,
    L: ActivationAdapter,
{
    async fn activate(
        &self,
        resource_id: ResourceId,
        enabled: bool,
        keep_disabled: bool,
    ) -> Result<(), ActivationError> {
        match self {
            SubscriptionProvider::Modern(inner) => {
                inner.activate(resource_id, enabled, keep_disabled).await
            }
            SubscriptionProvider::Legacy(inner) => {
                if keep_disabled {
                    tracing::debug!(%resource_id, "legacy provider ignores keep-disabled");
                }
                inner.activate(resource_id, enabled, false).await
            }
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
