// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake SIM status adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SimStatusAdapter, SimStatusError, StatusSignal, SupplyResult};
use async_trait::async_trait;
use simsched_core::{ResourceId, Secret};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded delivery; the secret itself is never recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyCall {
    pub resource_id: ResourceId,
}

#[derive(Default)]
struct FakeSimState {
    demanding: Vec<ResourceId>,
    remaining: HashMap<ResourceId, u32>,
    scripted: HashMap<ResourceId, VecDeque<SupplyResult>>,
    accepted: HashMap<ResourceId, String>,
    calls: Vec<SupplyCall>,
}

/// Scriptable SIM service.
///
/// Deliveries answer from a per-resource script, then fall back to comparing
/// against the accepted code (or `Success` when none is set). `Success`
/// unlocks the SIM and raises the status signal; `Incorrect` burns an
/// attempt.
#[derive(Clone, Default)]
pub struct FakeSimStatusAdapter {
    state: Arc<Mutex<FakeSimState>>,
    signal: StatusSignal,
}

impl FakeSimStatusAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeSimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Put a SIM into the locked state and raise the status signal
    pub fn lock_sim(&self, id: ResourceId, remaining: u32) {
        {
            let mut inner = self.lock();
            if !inner.demanding.contains(&id) {
                inner.demanding.push(id);
            }
            inner.remaining.insert(id, remaining);
        }
        self.signal.notify();
    }

    /// Code the SIM accepts when no scripted answer is queued
    pub fn accept_code(&self, id: ResourceId, code: &str) {
        self.lock().accepted.insert(id, code.to_string());
    }

    /// Queue an answer for the next delivery to `id`
    pub fn script(&self, id: ResourceId, result: SupplyResult) {
        self.lock().scripted.entry(id).or_default().push_back(result);
    }

    pub fn is_demanding(&self, id: ResourceId) -> bool {
        self.lock().demanding.contains(&id)
    }

    /// Get all recorded deliveries
    pub fn calls(&self) -> Vec<SupplyCall> {
        self.lock().calls.clone()
    }
}

#[async_trait]
impl SimStatusAdapter for FakeSimStatusAdapter {
    async fn demanding_secret(&self) -> Result<Vec<ResourceId>, SimStatusError> {
        Ok(self.lock().demanding.clone())
    }

    async fn remaining_attempts(&self, id: ResourceId) -> Result<u32, SimStatusError> {
        Ok(self.lock().remaining.get(&id).copied().unwrap_or(0))
    }

    async fn supply_secret(
        &self,
        id: ResourceId,
        secret: &Secret,
    ) -> Result<SupplyResult, SimStatusError> {
        let result = {
            let mut inner = self.lock();
            inner.calls.push(SupplyCall { resource_id: id });
            let scripted = inner.scripted.get_mut(&id).and_then(VecDeque::pop_front);
            let result = match scripted {
                Some(result) => result,
                None => match inner.accepted.get(&id) {
                    Some(code) if code != secret.expose() => SupplyResult::Incorrect,
                    _ => SupplyResult::Success,
                },
            };
            match result {
                SupplyResult::Success => {
                    inner.demanding.retain(|d| *d != id);
                }
                SupplyResult::Incorrect => {
                    let remaining = inner.remaining.entry(id).or_insert(0);
                    *remaining = remaining.saturating_sub(1);
                }
                SupplyResult::Unknown(_) => {}
            }
            result
        };
        if result == SupplyResult::Success {
            self.signal.notify();
        }
        Ok(result)
    }

    fn status_signal(&self) -> StatusSignal {
        self.signal.clone()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
