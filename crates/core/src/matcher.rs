// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Nearest-occurrence search over weekly rules
//!
//! Given a reference instant, find the closest time at which any live rule
//! for a `(resource, target state)` pair fires, either at/after or at/before
//! the instant. The reference is truncated to the minute first, so repeated
//! queries within one minute agree.
//!
//! Ties between rules at the same distance go to the lowest rule id.

use crate::days::day_index;
use crate::resource::ResourceId;
use crate::schedule::{truncate_to_minute, ScheduleRule, TimeOfDay};
use chrono::{Datelike, Days, NaiveDateTime, TimeDelta};

/// A concrete firing of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub rule: ScheduleRule,
    pub at: NaiveDateTime,
}

/// First firing of `rule` at or after `at`, ignoring liveness
pub fn next_occurrence(rule: &ScheduleRule, at: NaiveDateTime) -> Option<NaiveDateTime> {
    let reference = truncate_to_minute(at);
    let today = day_index(reference.weekday());

    if rule.days.is_set(today) && rule.time >= TimeOfDay::of(reference) {
        return Some(rule.time.on(reference.date()));
    }

    let distance = 1 + rule.days.distance_to_next_set(today + 1)?;
    let date = reference
        .date()
        .checked_add_days(Days::new(u64::from(distance)))?;
    Some(rule.time.on(date))
}

/// Last firing of `rule` at or before `at`, ignoring liveness
pub fn previous_occurrence(rule: &ScheduleRule, at: NaiveDateTime) -> Option<NaiveDateTime> {
    let reference = truncate_to_minute(at);
    let today = day_index(reference.weekday());

    if rule.days.is_set(today) && rule.time <= TimeOfDay::of(reference) {
        return Some(rule.time.on(reference.date()));
    }

    let distance = rule.days.distance_to_previous_set(today)?;
    let date = reference
        .date()
        .checked_sub_days(Days::new(u64::from(distance)))?;
    Some(rule.time.on(date))
}

/// Nearest-occurrence queries over a borrowed rule list
#[derive(Debug, Clone, Copy)]
pub struct ScheduleMatcher<'a> {
    rules: &'a [ScheduleRule],
}

impl<'a> ScheduleMatcher<'a> {
    pub fn new(rules: &'a [ScheduleRule]) -> Self {
        Self { rules }
    }

    /// Closest occurrence at or after `at`
    pub fn nearest_after(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
        at: NaiveDateTime,
    ) -> Option<Occurrence> {
        self.nearest(resource_id, target_enabled, at, next_occurrence)
    }

    /// Closest occurrence at or before `at`
    pub fn nearest_before(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
        at: NaiveDateTime,
    ) -> Option<Occurrence> {
        self.nearest(resource_id, target_enabled, at, previous_occurrence)
    }

    fn nearest(
        &self,
        resource_id: ResourceId,
        target_enabled: bool,
        at: NaiveDateTime,
        occurrence: fn(&ScheduleRule, NaiveDateTime) -> Option<NaiveDateTime>,
    ) -> Option<Occurrence> {
        let reference = truncate_to_minute(at);
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(resource_id, target_enabled))
            .filter_map(|rule| {
                occurrence(rule, reference).map(|at| Occurrence {
                    rule: rule.clone(),
                    at,
                })
            })
            .min_by_key(|candidate| (distance(reference, candidate.at), candidate.rule.id))
    }
}

fn distance(a: NaiveDateTime, b: NaiveDateTime) -> TimeDelta {
    (a - b).abs()
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
