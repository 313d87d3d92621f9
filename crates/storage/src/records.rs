// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row formats as written to disk
//!
//! Rows keep raw field values so that a malformed rule can be read, reported
//! and skipped instead of failing the whole load.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use simsched_core::{
    CoreError, DaySet, ResourceId, ResourceKind, ResourceState, RuleId, ScheduleRule, TimeOfDay,
    NEVER,
};
use thiserror::Error;

/// A rule row that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rule {id}: {source}")]
pub struct InvalidRule {
    pub id: u64,
    #[source]
    pub source: CoreError,
}

/// Stored form of a `ScheduleRule`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub id: u64,
    pub resource_id: u32,
    pub target_enabled: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Raw day mask, Sunday = bit 0
    pub days: u8,
    pub hour: u8,
    pub minute: u8,
}

fn default_true() -> bool {
    true
}

impl TryFrom<&RuleRecord> for ScheduleRule {
    type Error = InvalidRule;

    fn try_from(row: &RuleRecord) -> Result<Self, Self::Error> {
        let invalid = |source| InvalidRule { id: row.id, source };
        let days = DaySet::from_bits(row.days).map_err(invalid)?;
        let time = TimeOfDay::new(row.hour, row.minute).map_err(invalid)?;
        Ok(ScheduleRule {
            id: RuleId(row.id),
            resource_id: ResourceId(row.resource_id),
            target_enabled: row.target_enabled,
            enabled: row.enabled,
            days,
            time,
        })
    }
}

impl From<&ScheduleRule> for RuleRecord {
    fn from(rule: &ScheduleRule) -> Self {
        Self {
            id: rule.id.0,
            resource_id: rule.resource_id.0,
            target_enabled: rule.target_enabled,
            enabled: rule.enabled,
            days: rule.days.bits(),
            hour: rule.time.hour(),
            minute: rule.time.minute(),
        }
    }
}

/// Stored form of a `ResourceState`; `None` timestamps mean "never"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: u32,
    pub kind: ResourceKind,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activated_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deactivated_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_disabled_across_reboots: Option<bool>,
}

fn never_to_none(at: NaiveDateTime) -> Option<NaiveDateTime> {
    (at != NEVER).then_some(at)
}

impl From<&ResourceState> for ResourceRecord {
    fn from(state: &ResourceState) -> Self {
        Self {
            id: state.resource_id.0,
            kind: state.kind,
            enabled: state.current_enabled,
            last_activated_at: never_to_none(state.last_activated_at),
            last_deactivated_at: never_to_none(state.last_deactivated_at),
            keep_disabled_across_reboots: state.keep_disabled_across_reboots,
        }
    }
}

impl From<ResourceRecord> for ResourceState {
    fn from(row: ResourceRecord) -> Self {
        Self {
            resource_id: ResourceId(row.id),
            kind: row.kind,
            current_enabled: row.enabled,
            last_activated_at: row.last_activated_at.unwrap_or(NEVER),
            last_deactivated_at: row.last_deactivated_at.unwrap_or(NEVER),
            keep_disabled_across_reboots: row.keep_disabled_across_reboots,
        }
    }
}

/// Marker row for a stored secret the SIM rejected; never holds the secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidSecretRecord {
    pub resource_id: u32,
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
