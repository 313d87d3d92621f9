// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process timer that delivers wakes over a channel

use super::{TimerAdapter, TimerError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use simsched_core::{Clock, PendingSecret};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A programmed wake that came due
#[derive(Debug)]
pub struct WakeFired {
    pub at: NaiveDateTime,
    pub payload: Vec<PendingSecret>,
}

#[derive(Default)]
struct Slot {
    sleeper: Option<JoinHandle<()>>,
    /// Payload held by a parked wake
    parked: Vec<PendingSecret>,
}

impl Slot {
    fn clear(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
        self.parked.clear();
    }
}

/// Sleeps on the tokio runtime until the programmed local time.
///
/// The local target is converted to a relative delay against the clock when
/// programmed, so DST gaps resolve to an absolute duration.
#[derive(Clone)]
pub struct TokioTimer<C: Clock> {
    clock: C,
    tx: mpsc::Sender<WakeFired>,
    slot: Arc<Mutex<Slot>>,
}

impl<C: Clock> TokioTimer<C> {
    pub fn new(clock: C, tx: mpsc::Sender<WakeFired>) -> Self {
        Self {
            clock,
            tx,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a sleeper is currently armed
    pub fn is_armed(&self) -> bool {
        self.slot()
            .sleeper
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Number of secrets held by a parked wake
    pub fn parked_len(&self) -> usize {
        self.slot().parked.len()
    }
}

#[async_trait]
impl<C: Clock> TimerAdapter for TokioTimer<C> {
    async fn program_at(
        &self,
        at: NaiveDateTime,
        payload: Vec<PendingSecret>,
    ) -> Result<(), TimerError> {
        let mut slot = self.slot();
        slot.clear();

        if at == NaiveDateTime::MAX {
            slot.parked = payload;
            return Ok(());
        }

        let delay = (at - self.clock.now()).to_std().unwrap_or_default();
        let tx = self.tx.clone();
        slot.sleeper = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(WakeFired { at, payload }).await.is_err() {
                tracing::debug!(%at, "wake receiver dropped");
            }
        }));
        Ok(())
    }

    async fn cancel(&self) -> Result<(), TimerError> {
        self.slot().clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "tokio_timer_tests.rs"]
mod tests;
