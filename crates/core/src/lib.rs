// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! simsched-core: schedule types and decisions for SIM subscription windows
//!
//! This crate provides:
//! - `DaySet`, `TimeOfDay` and `ScheduleRule` for weekly recurring windows
//! - Nearest-occurrence search (`ScheduleMatcher`)
//! - The expected-state decision (`expected_state`)
//! - Clock abstraction, in-memory secrets, and the listener event bus
//!
//! Everything here is pure or in-memory; side effects live in the engine.

pub mod bus;
pub mod clock;
pub mod days;
pub mod error;
pub mod event;
pub mod matcher;
pub mod reconcile;
pub mod resource;
pub mod schedule;
pub mod secret;

pub use bus::{EventBus, EventPattern, EventReceiver, EventSender, SubscriberId};
pub use clock::{Clock, FakeClock, SystemClock};
pub use days::{day_index, DaySet, DAYS_PER_WEEK};
pub use error::CoreError;
pub use event::Event;
pub use matcher::{next_occurrence, previous_occurrence, Occurrence, ScheduleMatcher};
pub use reconcile::expected_state;
pub use resource::{ResourceId, ResourceKind, ResourceState};
pub use schedule::{truncate_to_minute, RuleId, ScheduleRule, TimeOfDay, NEVER};
pub use secret::{PendingSecret, Secret};
