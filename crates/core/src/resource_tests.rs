// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 4)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn new_resource_has_never_timestamps() {
    let state = ResourceState::new(ResourceId(1), ResourceKind::Embedded, false);
    assert_eq!(state.last_activated_at, NEVER);
    assert_eq!(state.last_deactivated_at, NEVER);
    assert!(!state.keeps_disabled());
}

#[test]
fn record_switch_moves_one_timestamp() {
    let mut state = ResourceState::new(ResourceId(1), ResourceKind::Physical { slot: 0 }, false);

    state.record_switch(true, noon());
    assert!(state.current_enabled);
    assert_eq!(state.last_activated_at, noon());
    assert_eq!(state.last_deactivated_at, NEVER);

    state.record_switch(false, noon());
    assert!(!state.current_enabled);
    assert_eq!(state.last_deactivated_at, noon());
}

#[test]
fn kind_is_tagged_in_json() {
    let json = serde_json::to_string(&ResourceKind::Physical { slot: 1 }).unwrap();
    assert_eq!(json, r#"{"type":"physical","slot":1}"#);
    assert!(ResourceKind::Physical { slot: 1 }.is_physical());
    assert!(!ResourceKind::Embedded.is_physical());
}
