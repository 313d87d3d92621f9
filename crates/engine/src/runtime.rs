// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine entry points for boot, hotplug, wake and manual toggles

use crate::feeder::{FeederReport, PinFeeder};
use crate::reconciler::{Outcome, Reconciler, SyncReport};
use crate::wake::{WakePlan, WakeScheduler};
use crate::{EngineConfig, EngineError};
use simsched_adapters::{Adapters, CallStateAdapter, SecretStoreAdapter};
use simsched_core::{Clock, EventBus, PendingSecret, ResourceId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Coordinates reconciliation, wake scheduling and PIN delivery
#[derive(Clone)]
pub struct Engine<A, C> {
    adapters: A,
    clock: C,
    bus: EventBus,
    config: EngineConfig,
    reconciler: Reconciler<A, C>,
    wake: WakeScheduler<A>,
    feeder: PinFeeder<A>,
    /// Resources with a deferred reconciliation waiting for a call to end
    deferred: Arc<Mutex<HashSet<ResourceId>>>,
}

impl<A: Adapters, C: Clock> Engine<A, C> {
    pub fn new(adapters: A, clock: C, config: EngineConfig) -> Self {
        Self::with_bus(adapters, clock, config, EventBus::new())
    }

    pub fn with_bus(adapters: A, clock: C, config: EngineConfig, bus: EventBus) -> Self {
        let reconciler = Reconciler::new(
            adapters.clone(),
            clock.clone(),
            bus.clone(),
            config.clone(),
        );
        let wake = WakeScheduler::new(adapters.clone(), bus.clone());
        let feeder = PinFeeder::new(adapters.clone(), bus.clone(), config.feeder.clone());
        Self {
            adapters,
            clock,
            bus,
            config,
            reconciler,
            wake,
            feeder,
            deferred: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn feeder(&self) -> &PinFeeder<A> {
        &self.feeder
    }

    /// Device finished booting
    pub async fn on_boot(&self) -> Result<SyncReport, EngineError> {
        tracing::info!("boot sync");
        self.resync().await
    }

    /// A SIM was inserted or removed
    pub async fn on_hotplug(&self) -> Result<SyncReport, EngineError> {
        tracing::info!("hotplug sync");
        self.resync().await
    }

    /// The programmed wake came due; the schedule overrides manual toggles
    pub async fn on_wake(&self, payload: Vec<PendingSecret>) -> Result<SyncReport, EngineError> {
        tracing::info!(payload_len = payload.len(), "scheduled wake");
        let report = self.reconciler.sync_all(true).await?;
        self.defer_all(&report, true);
        self.wake
            .recompute_next_wake(self.clock.now(), payload.clone())
            .await?;
        if report.any_enabled() && !payload.is_empty() {
            self.feeder.start(payload).await;
        }
        Ok(report)
    }

    /// The user toggled a resource by hand
    pub async fn on_manual_toggle(&self, resource_id: ResourceId) -> Result<Outcome, EngineError> {
        tracing::info!(%resource_id, "manual toggle");
        let outcome = self.reconciler.reconcile(resource_id, false).await?;
        if outcome == Outcome::Deferred {
            self.defer(resource_id, false);
        }
        self.wake
            .recompute_next_wake(self.clock.now(), Vec::new())
            .await?;
        Ok(outcome)
    }

    /// Recompute the wake without reconciling
    pub async fn recompute_wake(&self) -> Result<WakePlan, EngineError> {
        let secrets = self.known_secrets().await;
        self.wake
            .recompute_next_wake(self.clock.now(), secrets)
            .await
    }

    /// Stop any PIN delivery in progress
    pub async fn shutdown(&self) -> Option<FeederReport> {
        self.feeder.cancel().await
    }

    /// Resources still waiting for a call to end
    pub fn deferred(&self) -> Vec<ResourceId> {
        let mut ids: Vec<_> = self
            .deferred
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .copied()
            .collect();
        ids.sort();
        ids
    }

    async fn resync(&self) -> Result<SyncReport, EngineError> {
        let report = self.reconciler.sync_all(false).await?;
        self.defer_all(&report, false);
        let secrets = self.known_secrets().await;
        self.wake
            .recompute_next_wake(self.clock.now(), secrets.clone())
            .await?;
        if report.any_enabled() && !secrets.is_empty() {
            self.feeder.start(secrets).await;
        }
        Ok(report)
    }

    /// Secrets readable from the store, minus ones the SIM already rejected
    async fn known_secrets(&self) -> Vec<PendingSecret> {
        let store = self.adapters.secrets();
        if !store.is_unlockable().await {
            tracing::debug!("secret store locked");
            return Vec::new();
        }
        let ids = match store.list_pending().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "cannot list stored secrets");
                return Vec::new();
            }
        };

        let mut secrets = Vec::with_capacity(ids.len());
        for resource_id in ids {
            if store.is_marked_invalid(resource_id).await.unwrap_or(false) {
                tracing::debug!(%resource_id, "skipping secret flagged invalid");
                continue;
            }
            match store.get(resource_id).await {
                Ok(Some(secret)) => secrets.push(PendingSecret::new(resource_id, secret)),
                Ok(None) => {}
                Err(e) => tracing::warn!(%resource_id, error = %e, "cannot read secret"),
            }
        }
        secrets
    }

    fn defer_all(&self, report: &SyncReport, override_user_preference: bool) {
        for resource_id in report.deferred() {
            self.defer(resource_id, override_user_preference);
        }
    }

    /// Re-run reconciliation for `resource_id` once the call ends
    fn defer(&self, resource_id: ResourceId, override_user_preference: bool) {
        let inserted = self
            .deferred
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(resource_id);
        if !inserted {
            tracing::debug!(%resource_id, "already waiting for call end");
            return;
        }

        let engine = self.clone();
        tokio::spawn(async move {
            let call_state = engine.adapters.call_state();
            loop {
                tokio::time::sleep(engine.config.call_poll_interval).await;
                if !call_state.is_busy().await {
                    break;
                }
            }
            engine
                .deferred
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&resource_id);

            tracing::info!(%resource_id, "call ended, resuming reconciliation");
            match engine
                .reconciler
                .reconcile(resource_id, override_user_preference)
                .await
            {
                Ok(Outcome::Deferred) => engine.defer(resource_id, override_user_preference),
                Ok(_) => {}
                Err(e) => tracing::error!(%resource_id, error = %e, "deferred reconcile failed"),
            }
            if let Err(e) = engine.recompute_wake().await {
                tracing::error!(error = %e, "wake recompute failed");
            }
        });
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
