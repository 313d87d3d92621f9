// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events published to listeners when resource or wake state changes

use crate::resource::ResourceId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Observable outcomes of reconciliation, wake scheduling and PIN delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Resource was switched and the new state persisted
    ResourceChanged {
        resource_id: ResourceId,
        enabled: bool,
        at: NaiveDateTime,
    },

    /// Activation failed; the stored state is unchanged
    ActivationFailed {
        resource_id: ResourceId,
        enabled: bool,
        reason: String,
    },

    /// Resource disappeared before or during reconciliation
    ResourceVanished { resource_id: ResourceId },

    /// Disable postponed until the ongoing call ends
    ReconcileDeferred { resource_id: ResourceId },

    /// OS wake-up armed
    WakeProgrammed { at: NaiveDateTime },

    /// Wake-up armed at the far future only to keep the secret payload
    WakeParked,

    /// OS wake-up cancelled
    WakeCancelled,

    /// Secret accepted by the SIM
    PinDelivered { resource_id: ResourceId },

    /// Secret reported incorrect and flagged invalid
    PinRejected { resource_id: ResourceId },

    /// Too few attempts left to risk a delivery
    PinAborted {
        resource_id: ResourceId,
        remaining_attempts: u32,
    },

    /// Delivery gave up after repeated unknown results
    PinFailed { resource_id: ResourceId, attempts: u32 },
}

impl Event {
    /// Name used for subscription pattern matching
    pub fn name(&self) -> &'static str {
        match self {
            Event::ResourceChanged { .. } => "resource:changed",
            Event::ActivationFailed { .. } => "resource:activation-failed",
            Event::ResourceVanished { .. } => "resource:vanished",
            Event::ReconcileDeferred { .. } => "resource:deferred",
            Event::WakeProgrammed { .. } => "wake:programmed",
            Event::WakeParked => "wake:parked",
            Event::WakeCancelled => "wake:cancelled",
            Event::PinDelivered { .. } => "pin:delivered",
            Event::PinRejected { .. } => "pin:rejected",
            Event::PinAborted { .. } => "pin:aborted",
            Event::PinFailed { .. } => "pin:failed",
        }
    }

    /// Resource the event concerns, if any
    pub fn resource_id(&self) -> Option<ResourceId> {
        match self {
            Event::ResourceChanged { resource_id, .. }
            | Event::ActivationFailed { resource_id, .. }
            | Event::ResourceVanished { resource_id }
            | Event::ReconcileDeferred { resource_id }
            | Event::PinDelivered { resource_id }
            | Event::PinRejected { resource_id }
            | Event::PinAborted { resource_id, .. }
            | Event::PinFailed { resource_id, .. } => Some(*resource_id),
            Event::WakeProgrammed { .. } | Event::WakeParked | Event::WakeCancelled => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
