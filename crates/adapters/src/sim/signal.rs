// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sticky "status changed" flag
//!
//! Each notification bumps a generation counter. A watcher that marks the
//! current generation as seen and later waits wakes immediately if any
//! notification landed in between.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Sending half, cloneable and callable from any thread
#[derive(Clone)]
pub struct StatusSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for StatusSignal {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }
}

impl StatusSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status change
    pub fn notify(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    pub fn watch(&self) -> StatusWatch {
        StatusWatch {
            rx: self.tx.subscribe(),
        }
    }

    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }
}

/// Receiving half owned by one waiter
pub struct StatusWatch {
    rx: watch::Receiver<u64>,
}

impl StatusWatch {
    /// Consume pending notifications
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }

    /// Wait for a notification newer than the last `mark_seen`.
    ///
    /// Returns false on timeout.
    pub async fn changed(&mut self, timeout: Duration) -> bool {
        matches!(
            tokio::time::timeout(timeout, self.rx.changed()).await,
            Ok(Ok(()))
        )
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
