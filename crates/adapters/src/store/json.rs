// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store adapter over the JSON file store

use super::{StoreAdapter, StoreError};
use async_trait::async_trait;
use simsched_core::{ResourceId, ResourceState};
use simsched_storage::{JsonStore, RuleRecord, StorageError};

/// Runs `JsonStore` calls on the blocking pool
#[derive(Clone)]
pub struct JsonStoreAdapter {
    store: JsonStore,
}

impl JsonStoreAdapter {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(JsonStore) -> Result<T, StorageError> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(store))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl StoreAdapter for JsonStoreAdapter {
    async fn rules_for(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
    ) -> Result<Vec<RuleRecord>, StoreError> {
        self.blocking(move |store| {
            Ok(store
                .load_rule_records()?
                .into_iter()
                .filter(|row| row.resource_id == resource_id.0 && row.target_enabled == target_enabled)
                .collect())
        })
        .await
    }

    async fn has_rules(&self) -> Result<bool, StoreError> {
        self.blocking(|store| Ok(!store.load_rule_records()?.is_empty()))
            .await
    }

    async fn list_resources(&self) -> Result<Vec<ResourceState>, StoreError> {
        self.blocking(|store| store.list_resources()).await
    }

    async fn get_resource(&self, id: ResourceId) -> Result<Option<ResourceState>, StoreError> {
        self.blocking(move |store| match store.load_resource(id) {
            Ok(state) => Ok(Some(state)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn save_resource(&self, state: &ResourceState) -> Result<(), StoreError> {
        let state = state.clone();
        self.blocking(move |store| store.save_resource(&state)).await
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
