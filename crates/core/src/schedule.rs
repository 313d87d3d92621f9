// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weekly schedule rules
//!
//! A rule says: on every day in `days`, at `time`, drive `resource_id`
//! toward `target_enabled`. Times are local wall-clock values.

use crate::days::DaySet;
use crate::error::CoreError;
use crate::resource::ResourceId;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for "never happened"
pub const NEVER: NaiveDateTime = NaiveDateTime::MIN;

/// Drop seconds and sub-second precision.
///
/// Schedules have minute granularity, so every reference instant is
/// truncated before matching.
pub fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(
        NaiveTime::from_hms_opt(at.hour(), at.minute(), 0).unwrap_or(NaiveTime::MIN),
    )
}

/// Unique identifier for a schedule rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule-{}", self.0)
    }
}

/// Hour and minute at which a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, CoreError> {
        if hour > 23 || minute > 59 {
            return Err(CoreError::InvalidTimeOfDay { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Time-of-day of an instant, at minute granularity
    pub fn of(at: NaiveDateTime) -> Self {
        Self {
            hour: at.hour() as u8,
            minute: at.minute() as u8,
        }
    }

    pub fn to_naive(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// This time of day on `date`
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.to_naive())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// One weekly recurring instruction for a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRule {
    pub id: RuleId,
    pub resource_id: ResourceId,
    pub target_enabled: bool,
    pub enabled: bool,
    pub days: DaySet,
    pub time: TimeOfDay,
}

impl ScheduleRule {
    /// An enabled rule
    pub fn new(
        id: RuleId,
        resource_id: ResourceId,
        target_enabled: bool,
        days: DaySet,
        time: TimeOfDay,
    ) -> Self {
        Self {
            id,
            resource_id,
            target_enabled,
            enabled: true,
            days,
            time,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether the rule can ever fire
    pub fn is_live(&self) -> bool {
        self.enabled && !self.days.is_empty()
    }

    /// Whether the rule takes part in matching for `(resource_id, target)`
    pub fn applies_to(&self, resource_id: ResourceId, target_enabled: bool) -> bool {
        self.is_live() && self.resource_id == resource_id && self.target_enabled == target_enabled
    }
}

impl fmt::Display for ScheduleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} at {} on {}",
            self.id,
            if self.target_enabled { "enable" } else { "disable" },
            self.resource_id,
            self.time,
            self.days
        )
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
