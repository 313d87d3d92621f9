// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use simsched_core::{DaySet, ResourceKind, RuleId, ScheduleRule, TimeOfDay};
use tempfile::tempdir;

fn rule(id: u64, resource: u32, target: bool) -> ScheduleRule {
    ScheduleRule::new(
        RuleId(id),
        ResourceId(resource),
        target,
        DaySet::ALL,
        TimeOfDay::new(8, 0).unwrap(),
    )
}

#[tokio::test]
async fn rules_are_filtered_by_resource_and_target() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    store.save_rule(&rule(1, 1, true)).unwrap();
    store.save_rule(&rule(2, 1, false)).unwrap();
    store.save_rule(&rule(3, 2, true)).unwrap();
    let adapter = JsonStoreAdapter::new(store);

    let rows = adapter.rules_for(ResourceId(1), true).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert!(adapter.has_rules().await.unwrap());
}

#[tokio::test]
async fn empty_store_has_no_rules() {
    let dir = tempdir().unwrap();
    let adapter = JsonStoreAdapter::new(JsonStore::open(dir.path()).unwrap());
    assert!(!adapter.has_rules().await.unwrap());
    assert!(adapter.list_resources().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_resource_is_none() {
    let dir = tempdir().unwrap();
    let adapter = JsonStoreAdapter::new(JsonStore::open(dir.path()).unwrap());
    assert_eq!(adapter.get_resource(ResourceId(4)).await.unwrap(), None);

    let state = ResourceState::new(ResourceId(4), ResourceKind::Embedded, true);
    adapter.save_resource(&state).await.unwrap();
    assert_eq!(adapter.get_resource(ResourceId(4)).await.unwrap(), Some(state));
}
