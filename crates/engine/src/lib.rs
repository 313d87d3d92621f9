// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! simsched engine: reconciliation, wake scheduling and PIN delivery

mod config;
mod error;
mod feeder;
mod locks;
mod matcher;
mod reconciler;
mod runtime;
mod wake;

pub use config::{EngineConfig, FeederConfig};
pub use error::EngineError;
pub use feeder::{FeederReport, PinFeeder};
pub use locks::ResourceLocks;
pub use matcher::StoreMatcher;
pub use reconciler::{Outcome, Reconciler, SyncReport};
pub use runtime::Engine;
pub use wake::{WakePlan, WakeScheduler};
