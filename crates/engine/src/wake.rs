// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Choosing the single next OS wake-up

use crate::matcher::StoreMatcher;
use crate::EngineError;
use chrono::{NaiveDateTime, TimeDelta};
use simsched_adapters::{Adapters, SecretStoreAdapter, StoreAdapter, TimerAdapter};
use simsched_core::{truncate_to_minute, Event, EventBus, PendingSecret};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the wake slot should hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakePlan {
    /// Fire at the next schedule transition
    Armed { at: NaiveDateTime },
    /// No transition ahead, but secrets must be kept for a later wake
    Parked,
    Cancelled,
}

impl WakePlan {
    fn instant(self) -> Option<NaiveDateTime> {
        match self {
            WakePlan::Armed { at } => Some(at),
            WakePlan::Parked => Some(NaiveDateTime::MAX),
            WakePlan::Cancelled => None,
        }
    }
}

#[derive(Default)]
struct WakeState {
    /// Last plan handed to the timer; `None` until the first call succeeds
    applied: Option<WakePlan>,
    applied_payload: Vec<PendingSecret>,
    /// Payload carried by the next programmed wake
    payload: Vec<PendingSecret>,
}

/// Keeps the OS wake slot pointed at the next transition
#[derive(Clone)]
pub struct WakeScheduler<A> {
    adapters: A,
    bus: EventBus,
    state: Arc<Mutex<WakeState>>,
}

impl<A: Adapters> WakeScheduler<A> {
    pub fn new(adapters: A, bus: EventBus) -> Self {
        Self {
            adapters,
            bus,
            state: Arc::new(Mutex::new(WakeState::default())),
        }
    }

    /// Recompute the next wake strictly after `reference` and apply it.
    ///
    /// `known_secrets` replaces the attached payload only when non-empty.
    /// Repeating the last applied plan makes no timer call.
    pub async fn recompute_next_wake(
        &self,
        reference: NaiveDateTime,
        known_secrets: Vec<PendingSecret>,
    ) -> Result<WakePlan, EngineError> {
        let mut state = self.state.lock().await;
        if !known_secrets.is_empty() {
            state.payload = known_secrets;
        }

        let plan = self.plan(reference).await?;

        let unchanged = state.applied == Some(plan)
            && (plan == WakePlan::Cancelled || state.applied_payload == state.payload);
        if unchanged {
            tracing::debug!(?plan, "wake unchanged");
            return Ok(plan);
        }

        // Forget the applied plan until the timer confirms the new one
        state.applied = None;
        let timer = self.adapters.timer();
        match plan.instant() {
            Some(at) => {
                timer.program_at(at, state.payload.clone()).await?;
                state.applied_payload = state.payload.clone();
            }
            None => {
                timer.cancel().await?;
                state.payload.clear();
                state.applied_payload.clear();
            }
        }
        state.applied = Some(plan);

        tracing::info!(?plan, payload_len = state.applied_payload.len(), "wake applied");
        self.bus.publish(match plan {
            WakePlan::Armed { at } => Event::WakeProgrammed { at },
            WakePlan::Parked => Event::WakeParked,
            WakePlan::Cancelled => Event::WakeCancelled,
        });
        Ok(plan)
    }

    async fn plan(&self, reference: NaiveDateTime) -> Result<WakePlan, EngineError> {
        let store = self.adapters.store();
        let matcher = StoreMatcher::new(store.clone());

        // Occurrences within the reference minute are already due
        let after = truncate_to_minute(reference).checked_add_signed(TimeDelta::minutes(1));

        let mut next: Option<NaiveDateTime> = None;
        if let Some(after) = after {
            for resource in store.list_resources().await? {
                let target = !resource.current_enabled;
                if let Some(occurrence) = matcher
                    .nearest_after(resource.resource_id, target, after)
                    .await?
                {
                    next = Some(next.map_or(occurrence.at, |n| n.min(occurrence.at)));
                }
            }
        }

        if let Some(at) = next {
            return Ok(WakePlan::Armed { at });
        }
        if store.has_rules().await? && self.secrets_waiting().await {
            return Ok(WakePlan::Parked);
        }
        Ok(WakePlan::Cancelled)
    }

    async fn secrets_waiting(&self) -> bool {
        let secrets = self.adapters.secrets();
        if !secrets.is_unlockable().await {
            return false;
        }
        match secrets.list_pending().await {
            Ok(pending) => !pending.is_empty(),
            Err(e) => {
                tracing::warn!(error = %e, "cannot list stored secrets");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "wake_tests.rs"]
mod tests;
