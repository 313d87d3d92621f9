// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake call state for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::CallStateAdapter;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Call state toggled by the test
#[derive(Clone, Default)]
pub struct FakeCallStateAdapter {
    busy: Arc<AtomicBool>,
    queries: Arc<AtomicUsize>,
}

impl FakeCallStateAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    /// Number of `is_busy` calls so far
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallStateAdapter for FakeCallStateAdapter {
    async fn is_busy(&self) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.busy.load(Ordering::SeqCst)
    }
}
