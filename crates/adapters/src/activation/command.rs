// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-command activation adapter

use super::{ActivationAdapter, ActivationError, Capabilities};
use async_trait::async_trait;
use simsched_core::ResourceId;
use tokio::process::Command;

/// Exit status a command uses to report an unknown subscription
pub const EXIT_NOT_FOUND: i32 = 2;

/// Runs a configured `sh -c` template per activation.
///
/// Placeholders: `{resource}` (numeric id), `{state}` (`on`/`off`) and
/// `{keep}` (`1`/`0`).
#[derive(Clone, Debug)]
pub struct CommandActivator {
    template: String,
}

impl CommandActivator {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    fn render(&self, resource_id: ResourceId, enabled: bool, keep_disabled: bool) -> String {
        self.template
            .replace("{resource}", &resource_id.0.to_string())
            .replace("{state}", if enabled { "on" } else { "off" })
            .replace("{keep}", if keep_disabled { "1" } else { "0" })
    }

    /// Probe platform capabilities with `probe_command`.
    ///
    /// A zero exit status means the platform keeps disabled subscriptions off
    /// across reboots. A probe that cannot run counts as no capability.
    pub async fn probe(probe_command: Option<&str>) -> Capabilities {
        let Some(cmd) = probe_command else {
            return Capabilities::default();
        };
        match Command::new("sh").arg("-c").arg(cmd).output().await {
            Ok(output) => Capabilities {
                persistent_disable: output.status.success(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "capability probe failed to run");
                Capabilities::default()
            }
        }
    }
}

#[async_trait]
impl ActivationAdapter for CommandActivator {
    async fn activate(
        &self,
        resource_id: ResourceId,
        enabled: bool,
        keep_disabled: bool,
    ) -> Result<(), ActivationError> {
        let cmd = self.render(resource_id, enabled, keep_disabled);
        let output = Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ActivationError::Failed(e.to_string()))?;

        if output.status.success() {
            return Ok(());
        }
        if output.status.code() == Some(EXIT_NOT_FOUND) {
            return Err(ActivationError::NotFound(resource_id));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match stderr.trim() {
            "" => format!("exit status {}", output.status),
            trimmed => trimmed.to_string(),
        };
        Err(ActivationError::Failed(reason))
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
