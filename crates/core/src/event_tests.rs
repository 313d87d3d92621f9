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
fn event_serialization_roundtrip() {
    let events = vec![
        Event::ResourceChanged {
            resource_id: ResourceId(1),
            enabled: true,
            at: noon(),
        },
        Event::ActivationFailed {
            resource_id: ResourceId(2),
            enabled: false,
            reason: "timeout".to_string(),
        },
        Event::WakeProgrammed { at: noon() },
        Event::WakeCancelled,
        Event::PinAborted {
            resource_id: ResourceId(1),
            remaining_attempts: 2,
        },
    ];

    for event in events {
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}

#[test]
fn names_are_grouped_by_category() {
    assert_eq!(Event::WakeParked.name(), "wake:parked");
    assert_eq!(
        Event::PinRejected {
            resource_id: ResourceId(1)
        }
        .name(),
        "pin:rejected"
    );
    assert_eq!(
        Event::ResourceVanished {
            resource_id: ResourceId(1)
        }
        .name(),
        "resource:vanished"
    );
}

#[test]
fn resource_id_is_extracted() {
    let event = Event::PinFailed {
        resource_id: ResourceId(4),
        attempts: 3,
    };
    assert_eq!(event.resource_id(), Some(ResourceId(4)));
    assert_eq!(Event::WakeCancelled.resource_id(), None);
}
