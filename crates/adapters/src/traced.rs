// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::activation::{ActivationAdapter, ActivationError};
use crate::sim::{SimStatusAdapter, SimStatusError, StatusSignal, SupplyResult};
use crate::timer::{TimerAdapter, TimerError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use simsched_core::{PendingSecret, ResourceId, Secret};
use tracing::Instrument;

/// Wrapper that adds tracing to any ActivationAdapter
#[derive(Clone)]
pub struct TracedActivationAdapter<A> {
    inner: A,
}

impl<A> TracedActivationAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: ActivationAdapter> ActivationAdapter for TracedActivationAdapter<A> {
    async fn activate(
        &self,
        resource_id: ResourceId,
        enabled: bool,
        keep_disabled: bool,
    ) -> Result<(), ActivationError> {
        let span = tracing::info_span!("activation.activate", %resource_id, enabled, keep_disabled);
        async move {
            tracing::info!("starting");

            let start = std::time::Instant::now();
            let result = self
                .inner
                .activate(resource_id, enabled, keep_disabled)
                .await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "switched"),
                // Expected race with hotplug
                Err(ActivationError::NotFound(_)) => {
                    tracing::warn!(elapsed_ms, "resource not found")
                }
                Err(e) => tracing::error!(elapsed_ms, error = %e, "activation failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any TimerAdapter
#[derive(Clone)]
pub struct TracedTimerAdapter<T> {
    inner: T,
}

impl<T> TracedTimerAdapter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: TimerAdapter> TimerAdapter for TracedTimerAdapter<T> {
    async fn program_at(
        &self,
        at: NaiveDateTime,
        payload: Vec<PendingSecret>,
    ) -> Result<(), TimerError> {
        let span = tracing::info_span!("timer.program_at", %at, payload_len = payload.len());
        async move {
            let result = self.inner.program_at(at, payload).await;
            match &result {
                Ok(()) if at == NaiveDateTime::MAX => tracing::info!("parked"),
                Ok(()) => tracing::info!("programmed"),
                Err(e) => tracing::error!(error = %e, "program failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn cancel(&self) -> Result<(), TimerError> {
        let span = tracing::info_span!("timer.cancel");
        async move {
            let result = self.inner.cancel().await;
            match &result {
                Ok(()) => tracing::info!("cancelled"),
                Err(e) => tracing::warn!(error = %e, "cancel failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any SimStatusAdapter.
///
/// Only resource ids and outcomes are logged.
#[derive(Clone)]
pub struct TracedSimStatusAdapter<S> {
    inner: S,
}

impl<S> TracedSimStatusAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SimStatusAdapter> SimStatusAdapter for TracedSimStatusAdapter<S> {
    async fn demanding_secret(&self) -> Result<Vec<ResourceId>, SimStatusError> {
        let result = self.inner.demanding_secret().await;
        tracing::trace!(
            count = result.as_ref().map(|v| v.len()).ok(),
            "listed demanding resources"
        );
        result
    }

    async fn remaining_attempts(&self, id: ResourceId) -> Result<u32, SimStatusError> {
        let result = self.inner.remaining_attempts(id).await;
        tracing::debug!(resource_id = %id, remaining = ?result.as_ref().ok(), "checked attempts");
        result
    }

    async fn supply_secret(
        &self,
        id: ResourceId,
        secret: &Secret,
    ) -> Result<SupplyResult, SimStatusError> {
        let span = tracing::info_span!("sim.supply_secret", resource_id = %id);
        async move {
            let start = std::time::Instant::now();
            let result = self.inner.supply_secret(id, secret).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(SupplyResult::Success) => tracing::info!(elapsed_ms, "accepted"),
                Ok(SupplyResult::Incorrect) => tracing::warn!(elapsed_ms, "rejected"),
                Ok(SupplyResult::Unknown(reason)) => {
                    tracing::warn!(elapsed_ms, reason = %reason, "unknown result")
                }
                Err(e) => tracing::error!(elapsed_ms, error = %e, "delivery failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    fn status_signal(&self) -> StatusSignal {
        self.inner.status_signal()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
