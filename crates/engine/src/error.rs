// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use simsched_adapters::{SecretError, SimStatusError, StoreError, TimerError};
use thiserror::Error;

/// Errors that can occur in the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),
    #[error("secret store error: {0}")]
    Secrets(#[from] SecretError),
    #[error("sim status error: {0}")]
    SimStatus(#[from] SimStatusError),
}
