// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wake-up timers

mod tokio_timer;

pub use tokio_timer::{TokioTimer, WakeFired};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTimerAdapter, TimerCall};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use simsched_core::PendingSecret;
use thiserror::Error;

/// Errors from timer operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for the single OS wake-up slot
///
/// Programming replaces whatever was programmed before.
#[async_trait]
pub trait TimerAdapter: Clone + Send + Sync + 'static {
    /// Fire at local time `at`, handing `payload` back on wake.
    ///
    /// `NaiveDateTime::MAX` keeps the payload without ever firing.
    async fn program_at(
        &self,
        at: NaiveDateTime,
        payload: Vec<PendingSecret>,
    ) -> Result<(), TimerError>;

    async fn cancel(&self) -> Result<(), TimerError>;
}

/// Timer that drops every request
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpTimerAdapter;

impl NoOpTimerAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TimerAdapter for NoOpTimerAdapter {
    async fn program_at(
        &self,
        _at: NaiveDateTime,
        _payload: Vec<PendingSecret>,
    ) -> Result<(), TimerError> {
        Ok(())
    }

    async fn cancel(&self) -> Result<(), TimerError> {
        Ok(())
    }
}
