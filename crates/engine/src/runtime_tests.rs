// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine entry point tests

use super::*;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use simsched_adapters::{FakeAdapters, TimerCall};
use simsched_core::{
    DaySet, FakeClock, ResourceKind, ResourceState, RuleId, ScheduleRule, Secret, TimeOfDay,
};
use std::time::Duration;

/// 2026-03-04 is a Wednesday
fn wed(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 4)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn weekday_rule(id: u64, resource: u32, target: bool, hour: u8) -> ScheduleRule {
    ScheduleRule::new(
        RuleId(id),
        ResourceId(resource),
        target,
        DaySet::WEEKDAYS,
        TimeOfDay::new(hour, 0).unwrap(),
    )
}

fn physical(id: u32, enabled: bool) -> ResourceState {
    ResourceState::new(ResourceId(id), ResourceKind::Physical { slot: 0 }, enabled)
}

/// Resource 1 runs 08:00-19:00 on weekdays
fn setup(now: NaiveDateTime) -> (FakeAdapters, FakeClock, Engine<FakeAdapters, FakeClock>) {
    let adapters = FakeAdapters::new();
    adapters.store.add_rule(&weekday_rule(1, 1, true, 8));
    adapters.store.add_rule(&weekday_rule(2, 1, false, 19));
    let clock = FakeClock::new(now);
    let engine = Engine::new(adapters.clone(), clock.clone(), EngineConfig::for_testing());
    (adapters, clock, engine)
}

#[tokio::test(start_paused = true)]
async fn boot_enables_and_feeds_known_secret() {
    let (adapters, _, engine) = setup(wed(9, 0));
    let mut state = physical(1, false);
    state.last_deactivated_at = wed(9, 0) - TimeDelta::days(1);
    adapters.store.put_resource(state);
    adapters.secrets.insert(ResourceId(1), "1234");
    adapters.sim_status.lock_sim(ResourceId(1), 3);

    let report = engine.on_boot().await.unwrap();

    assert_eq!(report.enabled(), vec![ResourceId(1)]);
    assert_eq!(
        adapters.timer.calls(),
        vec![TimerCall::ProgramAt {
            at: wed(19, 0),
            resources: vec![ResourceId(1)],
        }]
    );
    let fed = engine.feeder().wait().await.unwrap();
    assert_eq!(fed.delivered, vec![ResourceId(1)]);
}

#[tokio::test(start_paused = true)]
async fn boot_without_secrets_starts_no_feeder() {
    let (adapters, _, engine) = setup(wed(9, 0));
    adapters.store.put_resource(physical(1, false));

    let report = engine.on_boot().await.unwrap();

    assert!(report.any_enabled());
    assert!(engine.feeder().wait().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn boot_keeps_manual_enable_after_end() {
    let (adapters, _, engine) = setup(wed(20, 0));
    let mut state = physical(1, true);
    state.last_activated_at = wed(19, 30);
    adapters.store.put_resource(state);

    let report = engine.on_hotplug().await.unwrap();

    assert_eq!(report.outcome(ResourceId(1)), Some(&Outcome::Unchanged));
    assert!(adapters.activation.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn wake_overrides_manual_enable() {
    let (adapters, _, engine) = setup(wed(20, 0));
    let mut state = physical(1, true);
    state.last_activated_at = wed(19, 30);
    adapters.store.put_resource(state);

    let report = engine.on_wake(Vec::new()).await.unwrap();

    assert_eq!(
        report.outcome(ResourceId(1)),
        Some(&Outcome::Changed { enabled: false })
    );
    // Off now, so the next wake is tomorrow's enable
    assert_eq!(
        adapters.timer.calls(),
        vec![TimerCall::ProgramAt {
            at: wed(8, 0) + TimeDelta::days(1),
            resources: vec![],
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn wake_feeds_payload_to_enabled_sims() {
    let (adapters, _, engine) = setup(wed(8, 0));
    adapters.store.put_resource(physical(1, false));
    adapters.sim_status.lock_sim(ResourceId(1), 3);

    let payload = vec![PendingSecret::new(ResourceId(1), Secret::new("1234"))];
    engine.on_wake(payload).await.unwrap();

    let fed = engine.feeder().wait().await.unwrap();
    assert_eq!(fed.delivered, vec![ResourceId(1)]);
    assert_eq!(
        adapters.timer.calls(),
        vec![TimerCall::ProgramAt {
            at: wed(19, 0),
            resources: vec![ResourceId(1)],
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn wake_without_enabled_sims_starts_no_feeder() {
    let (adapters, _, engine) = setup(wed(8, 0));
    adapters.store.put_resource(physical(1, true));

    let payload = vec![PendingSecret::new(ResourceId(1), Secret::new("1234"))];
    engine.on_wake(payload).await.unwrap();

    assert!(engine.feeder().wait().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn manual_toggle_recomputes_wake() {
    let (adapters, _, engine) = setup(wed(12, 0));
    let mut state = physical(1, false);
    state.last_deactivated_at = wed(11, 0);
    adapters.store.put_resource(state);

    let outcome = engine.on_manual_toggle(ResourceId(1)).await.unwrap();

    assert_eq!(outcome, Outcome::Unchanged);
    // Off, so the next wake is tomorrow's enable
    assert_eq!(
        adapters.timer.calls(),
        vec![TimerCall::ProgramAt {
            at: wed(8, 0) + TimeDelta::days(1),
            resources: vec![],
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn deferred_disable_runs_after_call_ends() {
    let (adapters, _, engine) = setup(wed(19, 5));
    adapters.store.put_resource(physical(1, true));
    adapters.call_state.set_busy(true);

    let report = engine.on_wake(Vec::new()).await.unwrap();
    assert_eq!(report.outcome(ResourceId(1)), Some(&Outcome::Deferred));
    assert_eq!(engine.deferred(), vec![ResourceId(1)]);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(adapters.activation.calls().is_empty());

    adapters.call_state.set_busy(false);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(engine.deferred().is_empty());
    let calls = adapters.activation.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].enabled);
    assert!(!adapters.store.resource(ResourceId(1)).unwrap().current_enabled);
    assert_eq!(
        adapters.timer.calls().last(),
        Some(&TimerCall::ProgramAt {
            at: wed(8, 0) + TimeDelta::days(1),
            resources: vec![],
        })
    );
}

#[tokio::test(start_paused = true)]
async fn repeated_deferral_is_tracked_once() {
    let (adapters, _, engine) = setup(wed(19, 5));
    adapters.store.put_resource(physical(1, true));
    adapters.call_state.set_busy(true);

    engine.on_hotplug().await.unwrap();
    engine.on_hotplug().await.unwrap();

    assert_eq!(engine.deferred(), vec![ResourceId(1)]);
}

#[tokio::test(start_paused = true)]
async fn secrets_flagged_invalid_are_not_fed() {
    let (adapters, _, engine) = setup(wed(9, 0));
    adapters.store.put_resource(physical(1, false));
    adapters.secrets.insert(ResourceId(1), "1234");
    adapters.secrets.set_invalid(ResourceId(1));

    engine.on_boot().await.unwrap();

    assert!(engine.feeder().wait().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_feeder() {
    let (adapters, _, engine) = setup(wed(9, 0));
    adapters.store.put_resource(physical(1, false));
    adapters.secrets.insert(ResourceId(1), "1234");

    engine.on_boot().await.unwrap();
    let report = engine.shutdown().await.unwrap();

    assert_eq!(report.abandoned, vec![ResourceId(1)]);
    assert!(adapters.sim_status.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn wake_follows_the_clock() {
    let (adapters, clock, engine) = setup(wed(9, 0));
    adapters.store.put_resource(physical(1, true));

    engine.recompute_wake().await.unwrap();
    clock.set(wed(19, 0));
    adapters
        .store
        .put_resource(physical(1, false));
    engine.recompute_wake().await.unwrap();

    assert_eq!(
        adapters.timer.calls(),
        vec![
            TimerCall::ProgramAt {
                at: wed(19, 0),
                resources: vec![],
            },
            TimerCall::ProgramAt {
                at: wed(8, 0) + TimeDelta::days(1),
                resources: vec![],
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn manual_disable_just_after_enable_waits_for_next_enable() {
    let now = wed(8, 0) + TimeDelta::seconds(20);
    let (adapters, _, engine) = setup(now);
    let mut state = physical(1, false);
    state.last_activated_at = wed(8, 0);
    state.last_deactivated_at = now;
    adapters.store.put_resource(state);

    let outcome = engine.on_manual_toggle(ResourceId(1)).await.unwrap();

    assert_eq!(outcome, Outcome::Unchanged);
    // Thursday's enable, not the 08:00 that already passed
    assert_eq!(
        adapters.timer.calls(),
        vec![TimerCall::ProgramAt {
            at: wed(8, 0) + TimeDelta::days(1),
            resources: vec![],
        }]
    );
}
