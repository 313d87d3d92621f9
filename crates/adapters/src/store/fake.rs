// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StoreAdapter, StoreError};
use async_trait::async_trait;
use simsched_core::{ResourceId, ResourceState, ScheduleRule};
use simsched_storage::RuleRecord;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeStoreState {
    rules: Vec<RuleRecord>,
    resources: Vec<ResourceState>,
    saves: Vec<ResourceState>,
    rule_queries: usize,
    fail_saves: bool,
}

/// In-memory store with call recording
#[derive(Clone, Default)]
pub struct FakeStoreAdapter {
    state: Arc<Mutex<FakeStoreState>>,
}

impl FakeStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeStoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_rule(&self, rule: &ScheduleRule) {
        self.add_rule_record(RuleRecord::from(rule));
    }

    /// Add a raw row, possibly malformed
    pub fn add_rule_record(&self, row: RuleRecord) {
        self.lock().rules.push(row);
    }

    pub fn clear_rules(&self) {
        self.lock().rules.clear();
    }

    /// Insert or replace a resource, keeping listing order
    pub fn put_resource(&self, state: ResourceState) {
        let mut inner = self.lock();
        match inner
            .resources
            .iter_mut()
            .find(|r| r.resource_id == state.resource_id)
        {
            Some(existing) => *existing = state,
            None => inner.resources.push(state),
        }
    }

    pub fn remove_resource(&self, id: ResourceId) {
        self.lock().resources.retain(|r| r.resource_id != id);
    }

    pub fn resource(&self, id: ResourceId) -> Option<ResourceState> {
        self.lock()
            .resources
            .iter()
            .find(|r| r.resource_id == id)
            .cloned()
    }

    /// Every state passed to `save_resource`
    pub fn saves(&self) -> Vec<ResourceState> {
        self.lock().saves.clone()
    }

    pub fn rule_queries(&self) -> usize {
        self.lock().rule_queries
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }
}

#[async_trait]
impl StoreAdapter for FakeStoreAdapter {
    async fn rules_for(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
    ) -> Result<Vec<RuleRecord>, StoreError> {
        let mut inner = self.lock();
        inner.rule_queries += 1;
        Ok(inner
            .rules
            .iter()
            .filter(|row| row.resource_id == resource_id.0 && row.target_enabled == target_enabled)
            .cloned()
            .collect())
    }

    async fn has_rules(&self) -> Result<bool, StoreError> {
        Ok(!self.lock().rules.is_empty())
    }

    async fn list_resources(&self) -> Result<Vec<ResourceState>, StoreError> {
        Ok(self.lock().resources.clone())
    }

    async fn get_resource(&self, id: ResourceId) -> Result<Option<ResourceState>, StoreError> {
        Ok(self.resource(id))
    }

    async fn save_resource(&self, state: &ResourceState) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.fail_saves {
            return Err(StoreError::Unavailable("save disabled".to_string()));
        }
        inner.saves.push(state.clone());
        drop(inner);
        self.put_resource(state.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
