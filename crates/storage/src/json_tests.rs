// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use simsched_core::{DaySet, ResourceKind, TimeOfDay};
use tempfile::tempdir;

fn rule(id: u64, resource: u32) -> ScheduleRule {
    ScheduleRule::new(
        RuleId(id),
        ResourceId(resource),
        true,
        DaySet::WEEKDAYS,
        TimeOfDay::new(8, 0).unwrap(),
    )
}

#[test]
fn open_creates_directories() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path().join("state")).unwrap();
    assert!(store.base_path().join("rules").is_dir());
    assert!(store.base_path().join("resources").is_dir());
}

#[test]
fn rules_are_listed_in_id_order() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    store.save_rule(&rule(12, 1)).unwrap();
    store.save_rule(&rule(3, 1)).unwrap();
    store.save_rule(&rule(7, 2)).unwrap();

    let ids: Vec<u64> = store
        .load_rule_records()
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![3, 7, 12]);
}

#[test]
fn deleted_rule_disappears() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    store.save_rule(&rule(1, 1)).unwrap();
    store.delete_rule(RuleId(1)).unwrap();
    assert!(store.load_rule_records().unwrap().is_empty());
    // Deleting again is fine
    store.delete_rule(RuleId(1)).unwrap();
}

#[test]
fn unparseable_rows_are_skipped() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    store.save_rule(&rule(1, 1)).unwrap();
    std::fs::write(dir.path().join("rules").join("2.json"), "{not json").unwrap();
    std::fs::write(dir.path().join("rules").join("notes.txt"), "ignored").unwrap();

    let rows = store.load_rule_records().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
}

#[test]
fn malformed_values_are_kept_as_raw_rows() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let mut row = RuleRecord::from(&rule(5, 1));
    row.hour = 30;
    store.save_rule_record(&row).unwrap();

    let rows = store.load_rule_records().unwrap();
    assert_eq!(rows, vec![row]);
    assert!(ScheduleRule::try_from(&rows[0]).is_err());
}

#[test]
fn resources_round_trip() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let state = ResourceState::new(ResourceId(2), ResourceKind::Physical { slot: 1 }, true);
    store.save_resource(&state).unwrap();

    assert_eq!(store.load_resource(ResourceId(2)).unwrap(), state);
    assert!(matches!(
        store.load_resource(ResourceId(9)),
        Err(StorageError::NotFound { kind: "resources", .. })
    ));
}

#[test]
fn resources_are_listed_in_id_order() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    for id in [5, 1, 3] {
        store
            .save_resource(&ResourceState::new(ResourceId(id), ResourceKind::Embedded, false))
            .unwrap();
    }
    let ids: Vec<u32> = store
        .list_resources()
        .unwrap()
        .iter()
        .map(|s| s.resource_id.0)
        .collect();
    assert_eq!(ids, vec![1, 3, 5]);

    store.delete_resource(ResourceId(3)).unwrap();
    assert_eq!(store.list_resources().unwrap().len(), 2);
}

#[test]
fn save_overwrites_without_leaving_temp_files() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let mut state = ResourceState::new(ResourceId(1), ResourceKind::Embedded, false);
    store.save_resource(&state).unwrap();
    state.current_enabled = true;
    store.save_resource(&state).unwrap();

    assert!(store.load_resource(ResourceId(1)).unwrap().current_enabled);
    let leftovers = std::fs::read_dir(dir.path().join("resources"))
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .path()
                .to_string_lossy()
                .ends_with(".tmp")
        })
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn secret_flags_survive_reopen() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    store.mark_secret_invalid(ResourceId(2)).unwrap();

    let reopened = JsonStore::open(dir.path()).unwrap();
    assert!(reopened.is_secret_invalid(ResourceId(2)));
    assert!(!reopened.is_secret_invalid(ResourceId(3)));

    reopened.mark_secret_valid(ResourceId(2)).unwrap();
    assert!(!store.is_secret_invalid(ResourceId(2)));
    // Clearing an unflagged secret is a no-op
    reopened.mark_secret_valid(ResourceId(3)).unwrap();
}
