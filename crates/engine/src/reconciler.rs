// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applying the expected state to resources

use crate::locks::ResourceLocks;
use crate::matcher::StoreMatcher;
use crate::{EngineConfig, EngineError};
use simsched_adapters::{
    ActivationAdapter, ActivationError, Adapters, CallStateAdapter, Notification, NotifyAdapter,
    StoreAdapter,
};
use simsched_core::{expected_state, Clock, Event, EventBus, ResourceId, ResourceState};

/// Result of reconciling one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Switched and persisted
    Changed { enabled: bool },
    /// Already in the expected state
    Unchanged,
    /// Disable postponed until the ongoing call ends
    Deferred,
    /// Resource no longer exists
    Missing,
    /// Activation failed or timed out; stored state untouched
    Failed { reason: String },
}

/// Per-resource outcomes of a sync pass, in store listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub outcomes: Vec<(ResourceId, Outcome)>,
}

impl SyncReport {
    /// Resources switched on during the pass
    pub fn enabled(&self) -> Vec<ResourceId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Changed { enabled: true }))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled().is_empty()
    }

    pub fn deferred(&self) -> Vec<ResourceId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == Outcome::Deferred)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn outcome(&self, id: ResourceId) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(resource_id, _)| *resource_id == id)
            .map(|(_, outcome)| outcome)
    }
}

/// Single decision point for resource state changes
#[derive(Clone)]
pub struct Reconciler<A, C> {
    adapters: A,
    clock: C,
    bus: EventBus,
    locks: ResourceLocks,
    config: EngineConfig,
}

impl<A: Adapters, C: Clock> Reconciler<A, C> {
    pub fn new(adapters: A, clock: C, bus: EventBus, config: EngineConfig) -> Self {
        Self {
            adapters,
            clock,
            bus,
            locks: ResourceLocks::new(),
            config,
        }
    }

    /// Bring one resource in line with its schedule
    pub async fn reconcile(
        &self,
        resource_id: ResourceId,
        override_user_preference: bool,
    ) -> Result<Outcome, EngineError> {
        self.reconcile_with(resource_id, override_user_preference, false)
            .await
    }

    /// `settle` waits `settle_delay` before switching a physical resource
    async fn reconcile_with(
        &self,
        resource_id: ResourceId,
        override_user_preference: bool,
        settle: bool,
    ) -> Result<Outcome, EngineError> {
        let _guard = self.locks.lock(resource_id).await;
        let store = self.adapters.store();

        let Some(mut state) = store.get_resource(resource_id).await? else {
            return Ok(self.vanished(resource_id));
        };

        let now = self.clock.now();
        let matcher = StoreMatcher::new(store.clone());
        let start = matcher
            .nearest_before(resource_id, true, now)
            .await?
            .map(|o| o.at);
        let end = matcher
            .nearest_before(resource_id, false, now)
            .await?
            .map(|o| o.at);

        let expected = expected_state(&state, start, end, override_user_preference);
        tracing::debug!(
            %resource_id,
            current = state.current_enabled,
            expected,
            override_user_preference,
            "decided"
        );

        if expected == state.current_enabled {
            return Ok(Outcome::Unchanged);
        }

        if !expected && state.kind.is_physical() && self.adapters.call_state().is_busy().await {
            tracing::info!(%resource_id, "call in progress, deferring disable");
            self.bus.publish(Event::ReconcileDeferred { resource_id });
            return Ok(Outcome::Deferred);
        }

        if settle && state.kind.is_physical() && !self.config.settle_delay.is_zero() {
            tracing::debug!(%resource_id, delay = ?self.config.settle_delay, "settling");
            tokio::time::sleep(self.config.settle_delay).await;
        }
        self.switch(&mut state, expected).await
    }

    async fn switch(
        &self,
        state: &mut ResourceState,
        expected: bool,
    ) -> Result<Outcome, EngineError> {
        let resource_id = state.resource_id;
        let timeout = self.config.activation_timeout;
        let attempt = tokio::time::timeout(
            timeout,
            self.adapters
                .activation()
                .activate(resource_id, expected, state.keeps_disabled()),
        )
        .await
        .unwrap_or(Err(ActivationError::Timeout(timeout)));

        match attempt {
            Ok(()) => {
                let at = self.clock.now();
                state.record_switch(expected, at);
                self.adapters.store().save_resource(state).await?;
                tracing::info!(%resource_id, enabled = expected, %at, "resource switched");
                self.bus.publish(Event::ResourceChanged {
                    resource_id,
                    enabled: expected,
                    at,
                });
                Ok(Outcome::Changed { enabled: expected })
            }
            Err(ActivationError::NotFound(_)) => Ok(self.vanished(resource_id)),
            Err(e) => {
                let reason = e.to_string();
                tracing::error!(%resource_id, expected, error = %reason, "activation failed");
                let verb = if expected { "enable" } else { "disable" };
                self.notify(Notification::new(
                    format!("Could not {} SIM", verb),
                    format!("{}: {}", resource_id, reason),
                ))
                .await;
                self.bus.publish(Event::ActivationFailed {
                    resource_id,
                    enabled: expected,
                    reason: reason.clone(),
                });
                Ok(Outcome::Failed { reason })
            }
        }
    }

    /// Reconcile every known resource in listing order.
    ///
    /// A failure on one resource is recorded and the pass continues.
    pub async fn sync_all(&self, override_user_preference: bool) -> Result<SyncReport, EngineError> {
        let resources = self.adapters.store().list_resources().await?;
        tracing::info!(count = resources.len(), override_user_preference, "sync pass");

        let mut report = SyncReport::default();
        let mut settle_pending = false;
        for resource in resources {
            let physical = resource.kind.is_physical();
            let outcome = match self
                .reconcile_with(resource.resource_id, override_user_preference, settle_pending)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(resource_id = %resource.resource_id, error = %e, "reconcile failed");
                    Outcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            if physical && matches!(outcome, Outcome::Changed { .. }) {
                settle_pending = true;
            }
            report.outcomes.push((resource.resource_id, outcome));
        }
        Ok(report)
    }

    fn vanished(&self, resource_id: ResourceId) -> Outcome {
        tracing::info!(%resource_id, "resource vanished");
        self.bus.publish(Event::ResourceVanished { resource_id });
        Outcome::Missing
    }

    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.adapters.notify().send(&notification).await {
            tracing::warn!(error = %e, "notification failed");
        }
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
