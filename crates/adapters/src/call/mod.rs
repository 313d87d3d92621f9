// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Telephony call state

use async_trait::async_trait;
use tokio::process::Command;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCallStateAdapter;

/// Adapter reporting whether a call is in progress
#[async_trait]
pub trait CallStateAdapter: Clone + Send + Sync + 'static {
    /// True while any call is ringing, dialing or active
    async fn is_busy(&self) -> bool;
}

/// Call state that never reports a call
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpCallStateAdapter;

impl NoOpCallStateAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CallStateAdapter for NoOpCallStateAdapter {
    async fn is_busy(&self) -> bool {
        false
    }
}

/// Call state read from a shell command; exit 0 means busy
#[derive(Clone, Debug)]
pub struct CommandCallState {
    command: String,
}

impl CommandCallState {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl CallStateAdapter for CommandCallState {
    async fn is_busy(&self) -> bool {
        match Command::new("sh").arg("-c").arg(&self.command).output().await {
            Ok(output) => output.status.success(),
            Err(e) => {
                tracing::warn!(error = %e, "call state command failed to run");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
