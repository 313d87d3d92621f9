// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivering unlock codes to SIMs after they are switched on
//!
//! One run owns a fixed set of pending secrets and cycles through:
//!
//! - scanning: clear the status flag, ask which SIMs want a code
//! - unlocking: deliver to each demanding SIM that has a pending code
//! - waiting: nothing demanding yet, wait for a status change or time out
//!
//! A run ends when no codes are left, on timeout, or when cancelled.

use crate::FeederConfig;
use simsched_adapters::{
    Adapters, Notification, NotifyAdapter, SecretStoreAdapter, SimStatusAdapter, StatusWatch,
    SupplyResult,
};
use simsched_core::{Event, EventBus, PendingSecret, ResourceId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// What happened to each code of a run; holds no secrets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeederReport {
    pub run: u64,
    pub delivered: Vec<ResourceId>,
    pub rejected: Vec<ResourceId>,
    pub aborted: Vec<ResourceId>,
    pub failed: Vec<ResourceId>,
    /// Dropped without a delivery on timeout or cancel
    pub abandoned: Vec<ResourceId>,
}

struct ActiveRun {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<FeederReport>,
}

/// Owns the single active delivery run
#[derive(Clone)]
pub struct PinFeeder<A> {
    adapters: A,
    bus: EventBus,
    config: FeederConfig,
    active: Arc<Mutex<Option<ActiveRun>>>,
    next_run: Arc<AtomicU64>,
}

impl<A: Adapters> PinFeeder<A> {
    pub fn new(adapters: A, bus: EventBus, config: FeederConfig) -> Self {
        Self {
            adapters,
            bus,
            config,
            active: Arc::new(Mutex::new(None)),
            next_run: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Start a run for `pending`, cancelling and awaiting any active run first
    pub async fn start(&self, pending: Vec<PendingSecret>) -> u64 {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            Self::stop(previous).await;
        }

        let run = self.next_run.fetch_add(1, Ordering::SeqCst);
        let (cancel, cancelled) = watch::channel(false);
        tracing::info!(run, pending = pending.len(), "feeder starting");

        let feeder_run = FeederRun {
            adapters: self.adapters.clone(),
            bus: self.bus.clone(),
            config: self.config.clone(),
            pending,
            cancelled,
            report: FeederReport {
                run,
                ..FeederReport::default()
            },
        };
        let handle = tokio::spawn(feeder_run.run());
        *active = Some(ActiveRun { cancel, handle });
        run
    }

    /// Cancel the active run, if any, and return its report
    pub async fn cancel(&self) -> Option<FeederReport> {
        let previous = self.active.lock().await.take()?;
        Some(Self::stop(previous).await)
    }

    /// Wait for the active run, if any, to finish on its own
    pub async fn wait(&self) -> Option<FeederReport> {
        let ActiveRun { cancel, handle } = self.active.lock().await.take()?;
        let report = Self::join(handle).await;
        drop(cancel);
        Some(report)
    }

    pub async fn is_running(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }

    async fn stop(run: ActiveRun) -> FeederReport {
        // The run may already be done and have dropped its receiver
        let _ = run.cancel.send(true);
        Self::join(run.handle).await
    }

    async fn join(handle: JoinHandle<FeederReport>) -> FeederReport {
        match handle.await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "feeder run ended abnormally");
                FeederReport::default()
            }
        }
    }
}

enum Delivery {
    Delivered,
    Rejected,
    Aborted,
    Failed,
    Cancelled,
}

struct FeederRun<A> {
    adapters: A,
    bus: EventBus,
    config: FeederConfig,
    pending: Vec<PendingSecret>,
    cancelled: watch::Receiver<bool>,
    report: FeederReport,
}

impl<A: Adapters> FeederRun<A> {
    async fn run(mut self) -> FeederReport {
        let sim = self.adapters.sim_status();
        let mut status = sim.status_signal().watch();

        while !self.pending.is_empty() && !self.is_cancelled() {
            status.mark_seen();
            let demanding = match sim.demanding_secret().await {
                Ok(demanding) => demanding,
                Err(e) => {
                    tracing::warn!(error = %e, "cannot read sim status");
                    Vec::new()
                }
            };

            let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|p| demanding.contains(&p.resource_id));
            self.pending = waiting;

            if ready.is_empty() {
                if !self.wait_for_change(&mut status).await {
                    break;
                }
                continue;
            }

            for secret in ready {
                let resource_id = secret.resource_id;
                match self.deliver(&secret).await {
                    Delivery::Delivered => self.report.delivered.push(resource_id),
                    Delivery::Rejected => self.report.rejected.push(resource_id),
                    Delivery::Aborted => self.report.aborted.push(resource_id),
                    Delivery::Failed => self.report.failed.push(resource_id),
                    Delivery::Cancelled => self.report.abandoned.push(resource_id),
                }
            }
        }

        self.report
            .abandoned
            .extend(self.pending.drain(..).map(|p| p.resource_id));
        tracing::info!(
            run = self.report.run,
            delivered = self.report.delivered.len(),
            rejected = self.report.rejected.len(),
            aborted = self.report.aborted.len(),
            failed = self.report.failed.len(),
            abandoned = self.report.abandoned.len(),
            "feeder finished"
        );
        self.report
    }

    fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Returns false when the run should end
    async fn wait_for_change(&mut self, status: &mut StatusWatch) -> bool {
        let pending = self.pending.len();
        let timeout = self.config.wait_timeout;
        tracing::debug!(pending, "waiting for sim status change");
        tokio::select! {
            changed = status.changed(timeout) => {
                if !changed {
                    tracing::info!(pending, "no sim asked for its code, giving up");
                }
                changed
            }
            _ = self.cancelled.changed() => false,
        }
    }

    async fn deliver(&mut self, pending: &PendingSecret) -> Delivery {
        let resource_id = pending.resource_id;
        let sim = self.adapters.sim_status();
        let mut attempts = 0;

        loop {
            if self.is_cancelled() {
                return Delivery::Cancelled;
            }

            let remaining = match sim.remaining_attempts(resource_id).await {
                Ok(remaining) => remaining,
                Err(e) => {
                    tracing::warn!(%resource_id, error = %e, "cannot read remaining attempts");
                    0
                }
            };
            if remaining < self.config.min_remaining_attempts {
                tracing::warn!(%resource_id, remaining, "too few attempts left, not delivering");
                self.bus.publish(Event::PinAborted {
                    resource_id,
                    remaining_attempts: remaining,
                });
                return Delivery::Aborted;
            }

            attempts += 1;
            let reason = match sim.supply_secret(resource_id, &pending.secret).await {
                Ok(SupplyResult::Success) => {
                    self.clear_invalid_flag(resource_id).await;
                    self.bus.publish(Event::PinDelivered { resource_id });
                    return Delivery::Delivered;
                }
                Ok(SupplyResult::Incorrect) => {
                    if let Err(e) = self.adapters.secrets().mark_invalid(resource_id).await {
                        tracing::warn!(%resource_id, error = %e, "cannot flag secret invalid");
                    }
                    self.bus.publish(Event::PinRejected { resource_id });
                    return Delivery::Rejected;
                }
                Ok(SupplyResult::Unknown(reason)) => reason,
                Err(e) => e.to_string(),
            };

            if attempts >= self.config.max_attempts {
                tracing::error!(%resource_id, attempts, reason = %reason, "delivery failed");
                let notification = Notification::new(
                    "Could not unlock SIM",
                    format!("{}: {}", resource_id, reason),
                );
                if let Err(e) = self.adapters.notify().send(&notification).await {
                    tracing::warn!(error = %e, "notification failed");
                }
                self.bus.publish(Event::PinFailed {
                    resource_id,
                    attempts,
                });
                return Delivery::Failed;
            }
            tracing::warn!(%resource_id, attempts, reason = %reason, "unknown delivery result, retrying");
        }
    }

    async fn clear_invalid_flag(&self, resource_id: ResourceId) {
        let secrets = self.adapters.secrets();
        match secrets.is_marked_invalid(resource_id).await {
            Ok(true) => {
                if let Err(e) = secrets.mark_valid(resource_id).await {
                    tracing::warn!(%resource_id, error = %e, "cannot clear invalid flag");
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(%resource_id, error = %e, "cannot read invalid flag"),
        }
    }
}

#[cfg(test)]
#[path = "feeder_tests.rs"]
mod tests;
