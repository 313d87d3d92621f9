// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::days::DaySet;
use crate::schedule::RuleId;
use chrono::{NaiveDate, Weekday};
use proptest::prelude::*;
use yare::parameterized;

const SIM: ResourceId = ResourceId(1);

// 2026-03-04 is a Wednesday
fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn rule(id: u64, target: bool, days: DaySet, hour: u8, minute: u8) -> ScheduleRule {
    ScheduleRule::new(
        RuleId(id),
        SIM,
        target,
        days,
        TimeOfDay::new(hour, minute).unwrap(),
    )
}

fn mon_wed_fri() -> DaySet {
    DaySet::from_days([Weekday::Mon, Weekday::Wed, Weekday::Fri])
}

#[test]
fn after_on_exact_occurrence_is_distance_zero() {
    let rules = vec![rule(1, true, mon_wed_fri(), 8, 0)];
    let found = ScheduleMatcher::new(&rules)
        .nearest_after(SIM, true, at(4, 8, 0))
        .unwrap();
    assert_eq!(found.at, at(4, 8, 0));
    assert_eq!(found.rule.id, RuleId(1));
}

#[test]
fn before_on_exact_occurrence_is_distance_zero() {
    let rules = vec![rule(1, true, mon_wed_fri(), 8, 0)];
    let found = ScheduleMatcher::new(&rules)
        .nearest_before(SIM, true, at(4, 8, 0))
        .unwrap();
    assert_eq!(found.at, at(4, 8, 0));
}

#[parameterized(
    one_minute_late = { at(4, 8, 1), at(6, 8, 0) },
    early_same_day = { at(4, 7, 59), at(4, 8, 0) },
    saturday_wraps_to_monday = { at(7, 10, 0), at(9, 8, 0) },
    friday_evening = { at(6, 20, 0), at(9, 8, 0) },
)]
fn nearest_after_walks_forward(reference: NaiveDateTime, expected: NaiveDateTime) {
    let rules = vec![rule(1, true, mon_wed_fri(), 8, 0)];
    let found = ScheduleMatcher::new(&rules).nearest_after(SIM, true, reference);
    assert_eq!(found.map(|o| o.at), Some(expected));
}

#[parameterized(
    one_minute_early = { at(4, 7, 59), at(2, 8, 0) },
    late_same_day = { at(4, 19, 0), at(4, 8, 0) },
    sunday_wraps_to_friday = { at(8, 10, 0), at(6, 8, 0) },
)]
fn nearest_before_walks_backward(reference: NaiveDateTime, expected: NaiveDateTime) {
    let rules = vec![rule(1, true, mon_wed_fri(), 8, 0)];
    let found = ScheduleMatcher::new(&rules).nearest_before(SIM, true, reference);
    assert_eq!(found.map(|o| o.at), Some(expected));
}

#[test]
fn single_day_rule_looks_a_full_week_back() {
    let rules = vec![rule(1, false, DaySet::from_days([Weekday::Wed]), 19, 0)];
    let matcher = ScheduleMatcher::new(&rules);
    assert_eq!(
        matcher.nearest_before(SIM, false, at(4, 18, 0)).map(|o| o.at),
        Some(at(4, 19, 0) - chrono::TimeDelta::days(7))
    );
    assert_eq!(
        matcher.nearest_after(SIM, false, at(4, 19, 1)).map(|o| o.at),
        Some(at(11, 19, 0))
    );
}

#[test]
fn seconds_are_ignored() {
    let rules = vec![rule(1, true, mon_wed_fri(), 8, 0)];
    let reference = at(4, 8, 0) + chrono::TimeDelta::seconds(45);
    let found = ScheduleMatcher::new(&rules).nearest_after(SIM, true, reference);
    assert_eq!(found.map(|o| o.at), Some(at(4, 8, 0)));
}

#[test]
fn closest_rule_wins() {
    let rules = vec![
        rule(1, true, DaySet::from_days([Weekday::Fri]), 8, 0),
        rule(2, true, DaySet::from_days([Weekday::Thu]), 9, 0),
    ];
    let found = ScheduleMatcher::new(&rules)
        .nearest_after(SIM, true, at(4, 12, 0))
        .unwrap();
    assert_eq!(found.rule.id, RuleId(2));
    assert_eq!(found.at, at(5, 9, 0));
}

#[test]
fn tie_goes_to_lowest_rule_id() {
    let rules = vec![
        rule(9, true, DaySet::ALL, 8, 0),
        rule(3, true, DaySet::ALL, 8, 0),
        rule(5, true, DaySet::ALL, 8, 0),
    ];
    let matcher = ScheduleMatcher::new(&rules);
    assert_eq!(
        matcher.nearest_after(SIM, true, at(4, 7, 0)).unwrap().rule.id,
        RuleId(3)
    );
    assert_eq!(
        matcher.nearest_before(SIM, true, at(4, 9, 0)).unwrap().rule.id,
        RuleId(3)
    );
}

#[test]
fn only_live_rules_for_the_pair_take_part() {
    let mut other_resource = rule(4, true, DaySet::ALL, 8, 0);
    other_resource.resource_id = ResourceId(2);
    let rules = vec![
        rule(1, true, DaySet::ALL, 8, 0).disabled(),
        rule(2, true, DaySet::EMPTY, 8, 0),
        rule(3, false, DaySet::ALL, 8, 0),
        other_resource,
    ];
    let matcher = ScheduleMatcher::new(&rules);
    assert!(matcher.nearest_after(SIM, true, at(4, 7, 0)).is_none());
    assert!(matcher.nearest_before(SIM, true, at(4, 7, 0)).is_none());
    assert_eq!(
        matcher.nearest_after(SIM, false, at(4, 7, 0)).map(|o| o.rule.id),
        Some(RuleId(3))
    );
}

fn arb_rule() -> impl Strategy<Value = ScheduleRule> {
    (
        1u64..50,
        any::<bool>(),
        any::<bool>(),
        0u8..=0x7f,
        0u8..24,
        0u8..60,
    )
        .prop_map(|(id, target, enabled, bits, hour, minute)| {
            let mut rule = rule(id, target, DaySet::from_bits_truncate(bits), hour, minute);
            rule.enabled = enabled;
            rule
        })
}

proptest! {
    #[test]
    fn none_iff_no_live_rule(
        rules in proptest::collection::vec(arb_rule(), 0..6),
        target in any::<bool>(),
        day in 1u32..29,
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let reference = NaiveDate::from_ymd_opt(2026, 2, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        let any_live = rules.iter().any(|r| r.applies_to(SIM, target));
        let matcher = ScheduleMatcher::new(&rules);

        let after = matcher.nearest_after(SIM, target, reference);
        let before = matcher.nearest_before(SIM, target, reference);
        prop_assert_eq!(after.is_some(), any_live);
        prop_assert_eq!(before.is_some(), any_live);

        if let (Some(after), Some(before)) = (after, before) {
            prop_assert!(after.at >= reference);
            prop_assert!(after.at - reference < chrono::TimeDelta::days(7));
            prop_assert!(before.at <= reference);
            prop_assert!(reference - before.at <= chrono::TimeDelta::days(7));
        }
    }
}
