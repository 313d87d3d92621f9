// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SIM status through external helper commands

use super::{SimStatusAdapter, SimStatusError, StatusSignal, SupplyResult};
use async_trait::async_trait;
use simsched_core::{ResourceId, Secret};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Exit status a supply command uses for a rejected code
pub const EXIT_INCORRECT: i32 = 1;

/// Reads SIM lock state from `status_command` and delivers codes with
/// `supply_command`.
///
/// `status_command` prints `<resource> <remaining>` per locked SIM.
/// `supply_command` receives `{resource}` and reads the code on stdin, so
/// the code never appears in a process argument list.
#[derive(Clone)]
pub struct CommandSimStatus {
    status_command: String,
    supply_command: String,
    signal: StatusSignal,
}

impl CommandSimStatus {
    pub fn new(status_command: impl Into<String>, supply_command: impl Into<String>) -> Self {
        Self {
            status_command: status_command.into(),
            supply_command: supply_command.into(),
            signal: StatusSignal::new(),
        }
    }

    async fn locked(&self) -> Result<Vec<(ResourceId, u32)>, SimStatusError> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.status_command)
            .output()
            .await
            .map_err(|e| SimStatusError::Unavailable(e.to_string()))?;
        if !output.status.success() {
            return Err(SimStatusError::Unavailable(format!(
                "status command exited with {}",
                output.status
            )));
        }
        Ok(parse_status(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn parse_status(stdout: &str) -> Vec<(ResourceId, u32)> {
    let mut locked = Vec::new();
    for line in stdout.lines() {
        let mut fields = line.split_whitespace();
        let (Some(id), Some(remaining)) = (fields.next(), fields.next()) else {
            continue;
        };
        match (id.parse::<u32>(), remaining.parse::<u32>()) {
            (Ok(id), Ok(remaining)) => locked.push((ResourceId(id), remaining)),
            _ => tracing::warn!(line, "skipping malformed status line"),
        }
    }
    locked
}

#[async_trait]
impl SimStatusAdapter for CommandSimStatus {
    async fn demanding_secret(&self) -> Result<Vec<ResourceId>, SimStatusError> {
        Ok(self.locked().await?.into_iter().map(|(id, _)| id).collect())
    }

    async fn remaining_attempts(&self, id: ResourceId) -> Result<u32, SimStatusError> {
        Ok(self
            .locked()
            .await?
            .into_iter()
            .find(|(locked, _)| *locked == id)
            .map_or(0, |(_, remaining)| remaining))
    }

    async fn supply_secret(
        &self,
        id: ResourceId,
        secret: &Secret,
    ) -> Result<SupplyResult, SimStatusError> {
        let cmd = self.supply_command.replace("{resource}", &id.0.to_string());
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SimStatusError::Unavailable(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = stdin.write_all(secret.expose().as_bytes()).await;
            drop(stdin);
            if let Err(e) = written {
                return Ok(SupplyResult::Unknown(e.to_string()));
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SimStatusError::Unavailable(e.to_string()))?;
        let result = match output.status.code() {
            Some(0) => SupplyResult::Success,
            Some(EXIT_INCORRECT) => SupplyResult::Incorrect,
            _ => SupplyResult::Unknown(String::from_utf8_lossy(&output.stderr).trim().to_string()),
        };
        if result != SupplyResult::Incorrect {
            self.signal.notify();
        }
        Ok(result)
    }

    fn status_signal(&self) -> StatusSignal {
        self.signal.clone()
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
