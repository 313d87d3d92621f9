// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake timer adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{TimerAdapter, TimerError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use simsched_core::{PendingSecret, ResourceId};
use std::sync::{Arc, Mutex};

/// Recorded timer call; payloads are recorded by resource id only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCall {
    ProgramAt {
        at: NaiveDateTime,
        resources: Vec<ResourceId>,
    },
    Cancel,
}

/// Fake timer that records calls
#[derive(Clone, Default)]
pub struct FakeTimerAdapter {
    calls: Arc<Mutex<Vec<TimerCall>>>,
}

impl FakeTimerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TimerCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl TimerAdapter for FakeTimerAdapter {
    async fn program_at(
        &self,
        at: NaiveDateTime,
        payload: Vec<PendingSecret>,
    ) -> Result<(), TimerError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(TimerCall::ProgramAt {
                at,
                resources: payload.iter().map(|p| p.resource_id).collect(),
            });
        Ok(())
    }

    async fn cancel(&self) -> Result<(), TimerError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(TimerCall::Cancel);
        Ok(())
    }
}
