// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controllable SIM subscriptions and their last known state

use crate::schedule::NEVER;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource-{}", self.0)
    }
}

/// How the subscription is bound to hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ResourceKind {
    /// Physical SIM in a card slot
    Physical { slot: u8 },
    /// Embedded profile
    Embedded,
}

impl ResourceKind {
    pub fn is_physical(self) -> bool {
        matches!(self, ResourceKind::Physical { .. })
    }
}

/// Last known state of a subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource_id: ResourceId,
    pub kind: ResourceKind,
    pub current_enabled: bool,
    pub last_activated_at: NaiveDateTime,
    pub last_deactivated_at: NaiveDateTime,
    /// `None` when the provider cannot persist a disabled state
    pub keep_disabled_across_reboots: Option<bool>,
}

impl ResourceState {
    /// A resource that was never toggled
    pub fn new(resource_id: ResourceId, kind: ResourceKind, current_enabled: bool) -> Self {
        Self {
            resource_id,
            kind,
            current_enabled,
            last_activated_at: NEVER,
            last_deactivated_at: NEVER,
            keep_disabled_across_reboots: None,
        }
    }

    /// Record a successful switch to `enabled` at `at`.
    ///
    /// Exactly one of the two timestamps moves.
    pub fn record_switch(&mut self, enabled: bool, at: NaiveDateTime) {
        self.current_enabled = enabled;
        if enabled {
            self.last_activated_at = at;
        } else {
            self.last_deactivated_at = at;
        }
    }

    pub fn keeps_disabled(&self) -> bool {
        self.keep_disabled_across_reboots.unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
