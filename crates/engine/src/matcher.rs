// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Nearest-occurrence queries against stored rules

use crate::EngineError;
use chrono::NaiveDateTime;
use simsched_adapters::StoreAdapter;
use simsched_core::{Occurrence, ResourceId, ScheduleMatcher, ScheduleRule};

/// Loads rules from the store per query and runs the schedule matcher
#[derive(Clone)]
pub struct StoreMatcher<S> {
    store: S,
}

impl<S: StoreAdapter> StoreMatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Nearest occurrence at or before `at`
    pub async fn nearest_before(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
        at: NaiveDateTime,
    ) -> Result<Option<Occurrence>, EngineError> {
        let rules = self.load(resource_id, target_enabled).await?;
        let found = ScheduleMatcher::new(&rules).nearest_before(resource_id, target_enabled, at);
        tracing::debug!(%resource_id, target_enabled, %at, found = ?found.as_ref().map(|o| o.at), "nearest before");
        Ok(found)
    }

    /// Nearest occurrence at or after `at`
    pub async fn nearest_after(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
        at: NaiveDateTime,
    ) -> Result<Option<Occurrence>, EngineError> {
        let rules = self.load(resource_id, target_enabled).await?;
        let found = ScheduleMatcher::new(&rules).nearest_after(resource_id, target_enabled, at);
        tracing::debug!(%resource_id, target_enabled, %at, found = ?found.as_ref().map(|o| o.at), "nearest after");
        Ok(found)
    }

    async fn load(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
    ) -> Result<Vec<ScheduleRule>, EngineError> {
        let rows = self.store.rules_for(resource_id, target_enabled).await?;
        let mut rules = Vec::with_capacity(rows.len());
        for row in &rows {
            match ScheduleRule::try_from(row) {
                Ok(rule) => rules.push(rule),
                Err(e) => tracing::warn!(error = %e, "skipping malformed rule"),
            }
        }
        Ok(rules)
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
