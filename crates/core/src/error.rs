// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for invalid schedule input

use thiserror::Error;

/// Errors raised when building core values from untrusted input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("day bits out of range: {0:#04x}")]
    InvalidDayBits(u8),
    #[error("time of day out of range: {hour:02}:{minute:02}")]
    InvalidTimeOfDay { hour: u8, minute: u8 },
}
