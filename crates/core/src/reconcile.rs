// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expected-state decision
//!
//! Decides whether a resource should be enabled right now from the nearest
//! past enable occurrence (`start`), the nearest past disable occurrence
//! (`end`) and the resource's own toggle history.
//!
//! With `override_user_preference` unset, a manual toggle made at or after
//! the last scheduled transition wins. With it set, the schedule wins.

use crate::resource::ResourceState;
use chrono::NaiveDateTime;

/// Whether the resource should currently be enabled
pub fn expected_state(
    state: &ResourceState,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    override_user_preference: bool,
) -> bool {
    if state.current_enabled {
        match end {
            Some(end) => {
                if !override_user_preference && state.last_activated_at >= end {
                    // Re-enabled by hand after the scheduled disable
                    return true;
                }
                match start {
                    Some(start) => {
                        start > end && state.last_deactivated_at < start && !state.keeps_disabled()
                    }
                    None => false,
                }
            }
            None => {
                if state.keep_disabled_across_reboots == Some(true) {
                    start.is_some_and(|start| state.last_deactivated_at < start)
                } else {
                    true
                }
            }
        }
    } else {
        match start {
            Some(start) => {
                if !override_user_preference && state.last_deactivated_at >= start {
                    // Disabled by hand after the scheduled enable
                    return false;
                }
                end.map_or(true, |end| end < start)
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
