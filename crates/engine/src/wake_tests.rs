// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{NaiveDate, TimeDelta};
use simsched_adapters::{FakeAdapters, TimerCall};
use simsched_core::{
    DaySet, ResourceId, ResourceKind, ResourceState, RuleId, ScheduleRule, Secret, TimeOfDay,
};

/// 2026-03-04 is a Wednesday
fn wed(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 4)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn daily(id: u64, resource: u32, target: bool, hour: u8) -> ScheduleRule {
    ScheduleRule::new(
        RuleId(id),
        ResourceId(resource),
        target,
        DaySet::ALL,
        TimeOfDay::new(hour, 0).unwrap(),
    )
}

fn resource(id: u32, enabled: bool) -> ResourceState {
    ResourceState::new(ResourceId(id), ResourceKind::Embedded, enabled)
}

fn secret(id: u32, code: &str) -> PendingSecret {
    PendingSecret::new(ResourceId(id), Secret::new(code))
}

fn setup() -> (FakeAdapters, EventBus, WakeScheduler<FakeAdapters>) {
    let adapters = FakeAdapters::new();
    let bus = EventBus::new();
    let wake = WakeScheduler::new(adapters.clone(), bus.clone());
    (adapters, bus, wake)
}

#[tokio::test]
async fn arms_at_earliest_transition_across_resources() {
    let (adapters, _, wake) = setup();
    // resource 1 is on and turns off at 19:00; resource 2 is off and turns on at 08:00
    adapters.store.add_rule(&daily(1, 1, false, 19));
    adapters.store.add_rule(&daily(2, 2, true, 8));
    adapters.store.put_resource(resource(1, true));
    adapters.store.put_resource(resource(2, false));

    let plan = wake.recompute_next_wake(wed(12, 0), Vec::new()).await.unwrap();

    assert_eq!(plan, WakePlan::Armed { at: wed(19, 0) });
    assert_eq!(
        adapters.timer.calls(),
        vec![TimerCall::ProgramAt {
            at: wed(19, 0),
            resources: vec![],
        }]
    );
}

#[tokio::test]
async fn target_follows_current_state() {
    let (adapters, _, wake) = setup();
    adapters.store.add_rule(&daily(1, 1, false, 19));
    adapters.store.add_rule(&daily(2, 1, true, 8));
    adapters.store.put_resource(resource(1, false));

    let plan = wake.recompute_next_wake(wed(12, 0), Vec::new()).await.unwrap();

    assert_eq!(
        plan,
        WakePlan::Armed {
            at: wed(8, 0) + TimeDelta::days(1)
        }
    );
}

#[tokio::test]
async fn repeated_recompute_makes_one_timer_call() {
    let (adapters, bus, wake) = setup();
    let (_, mut events) = bus.subscribe_all();
    adapters.store.add_rule(&daily(1, 1, false, 19));
    adapters.store.put_resource(resource(1, true));

    wake.recompute_next_wake(wed(12, 0), vec![secret(1, "1234")])
        .await
        .unwrap();
    wake.recompute_next_wake(wed(12, 0), Vec::new()).await.unwrap();
    wake.recompute_next_wake(wed(12, 30), vec![secret(1, "1234")])
        .await
        .unwrap();

    assert_eq!(adapters.timer.calls().len(), 1);
    assert_eq!(
        events.try_recv().unwrap(),
        Event::WakeProgrammed { at: wed(19, 0) }
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn new_payload_reprograms_same_instant() {
    let (adapters, _, wake) = setup();
    adapters.store.add_rule(&daily(1, 1, false, 19));
    adapters.store.put_resource(resource(1, true));

    wake.recompute_next_wake(wed(12, 0), vec![secret(1, "1234")])
        .await
        .unwrap();
    wake.recompute_next_wake(wed(12, 0), vec![secret(1, "1234"), secret(2, "5678")])
        .await
        .unwrap();

    let calls = adapters.timer.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        TimerCall::ProgramAt {
            at: wed(19, 0),
            resources: vec![ResourceId(1), ResourceId(2)],
        }
    );
}

#[tokio::test]
async fn empty_secrets_keep_previous_payload() {
    let (adapters, _, wake) = setup();
    adapters.store.add_rule(&daily(1, 1, false, 19));
    adapters.store.add_rule(&daily(2, 1, true, 8));
    adapters.store.put_resource(resource(1, true));

    wake.recompute_next_wake(wed(12, 0), vec![secret(1, "1234")])
        .await
        .unwrap();
    // Past 19:00 the next disable is tomorrow
    wake.recompute_next_wake(wed(20, 0), Vec::new()).await.unwrap();

    assert_eq!(
        adapters.timer.calls()[1],
        TimerCall::ProgramAt {
            at: wed(19, 0) + TimeDelta::days(1),
            resources: vec![ResourceId(1)],
        }
    );
}

#[tokio::test]
async fn parks_when_rules_exist_but_none_fire() {
    let (adapters, bus, wake) = setup();
    let (_, mut events) = bus.subscribe_all();
    adapters.store.add_rule(&daily(1, 1, false, 19).disabled());
    adapters.store.put_resource(resource(1, true));
    adapters.secrets.insert(ResourceId(1), "1234");

    let plan = wake.recompute_next_wake(wed(12, 0), vec![secret(1, "1234")])
        .await
        .unwrap();

    assert_eq!(plan, WakePlan::Parked);
    assert_eq!(
        adapters.timer.calls(),
        vec![TimerCall::ProgramAt {
            at: NaiveDateTime::MAX,
            resources: vec![ResourceId(1)],
        }]
    );
    assert_eq!(events.try_recv().unwrap(), Event::WakeParked);
}

#[tokio::test]
async fn locked_secret_store_cancels_instead_of_parking() {
    let (adapters, _, wake) = setup();
    adapters.store.add_rule(&daily(1, 1, false, 19).disabled());
    adapters.store.put_resource(resource(1, true));
    adapters.secrets.insert(ResourceId(1), "1234");
    adapters.secrets.set_unlockable(false);

    let plan = wake.recompute_next_wake(wed(12, 0), Vec::new()).await.unwrap();

    assert_eq!(plan, WakePlan::Cancelled);
}

#[tokio::test]
async fn first_cancel_is_forwarded_once() {
    let (adapters, bus, wake) = setup();
    let (_, mut events) = bus.subscribe_all();

    wake.recompute_next_wake(wed(12, 0), Vec::new()).await.unwrap();
    wake.recompute_next_wake(wed(13, 0), Vec::new()).await.unwrap();

    assert_eq!(adapters.timer.calls(), vec![TimerCall::Cancel]);
    assert_eq!(events.try_recv().unwrap(), Event::WakeCancelled);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn cancel_after_armed_is_forwarded() {
    let (adapters, _, wake) = setup();
    adapters.store.add_rule(&daily(1, 1, false, 19));
    adapters.store.put_resource(resource(1, true));
    wake.recompute_next_wake(wed(12, 0), Vec::new()).await.unwrap();

    adapters.store.clear_rules();
    let plan = wake.recompute_next_wake(wed(12, 0), Vec::new()).await.unwrap();

    assert_eq!(plan, WakePlan::Cancelled);
    assert_eq!(adapters.timer.calls().last(), Some(&TimerCall::Cancel));
}

#[tokio::test]
async fn transition_earlier_in_the_minute_is_not_rearmed() {
    let (adapters, _, wake) = setup();
    adapters.store.add_rule(&daily(1, 1, true, 8));
    adapters.store.put_resource(resource(1, false));

    // Switched off by hand 20 s after the scheduled 08:00 enable
    let reference = wed(8, 0) + TimeDelta::seconds(20);
    let plan = wake.recompute_next_wake(reference, Vec::new()).await.unwrap();

    assert_eq!(
        plan,
        WakePlan::Armed {
            at: wed(8, 0) + TimeDelta::days(1)
        }
    );
}

#[tokio::test]
async fn transition_at_the_reference_instant_is_not_rearmed() {
    let (adapters, _, wake) = setup();
    adapters.store.add_rule(&daily(1, 1, false, 19));
    adapters.store.put_resource(resource(1, true));

    let plan = wake.recompute_next_wake(wed(19, 0), Vec::new()).await.unwrap();

    assert_eq!(
        plan,
        WakePlan::Armed {
            at: wed(19, 0) + TimeDelta::days(1)
        }
    );
}

#[tokio::test]
async fn transition_in_the_next_minute_is_armed() {
    let (adapters, _, wake) = setup();
    adapters.store.add_rule(&daily(1, 1, true, 8));
    adapters.store.put_resource(resource(1, false));

    let reference = wed(7, 59) + TimeDelta::seconds(59);
    let plan = wake.recompute_next_wake(reference, Vec::new()).await.unwrap();

    assert_eq!(plan, WakePlan::Armed { at: wed(8, 0) });
}
