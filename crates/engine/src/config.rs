// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tuning knobs

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing for reconciliation and wake handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on a single activation call
    #[serde(with = "humantime_serde")]
    pub activation_timeout: Duration,
    /// Pause between consecutive physical SIM switches
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,
    /// How often a deferred disable re-checks the call state
    #[serde(with = "humantime_serde")]
    pub call_poll_interval: Duration,
    pub feeder: FeederConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            activation_timeout: Duration::from_secs(3),
            settle_delay: Duration::from_secs(2),
            call_poll_interval: Duration::from_secs(5),
            feeder: FeederConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Short delays for tests
    pub fn for_testing() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            call_poll_interval: Duration::from_millis(10),
            ..Self::default()
        }
    }
}

/// Limits for one PIN delivery run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeederConfig {
    /// How long to wait for a SIM to start demanding its code
    #[serde(with = "humantime_serde")]
    pub wait_timeout: Duration,
    /// Deliveries per resource when the result stays unknown
    pub max_attempts: u32,
    /// Never deliver when fewer attempts than this remain
    pub min_remaining_attempts: u32,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(10),
            max_attempts: 3,
            min_remaining_attempts: 3,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
