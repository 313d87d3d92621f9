// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secret store backed by an external password helper

use super::{SecretError, SecretStoreAdapter};
use async_trait::async_trait;
use simsched_core::{ResourceId, Secret};
use simsched_storage::{JsonStore, StorageError};
use tokio::process::Command;

/// Exit status a helper uses to report a locked keyring
pub const EXIT_LOCKED: i32 = 3;

/// Reads secrets through two shell commands.
///
/// `list_command` prints one resource id per line. `get_command` receives
/// `{resource}` and prints the secret on stdout. Invalid flags are rows in
/// `flags`, so a rejected secret stays flagged across restarts.
#[derive(Clone)]
pub struct CommandSecretStore {
    list_command: String,
    get_command: String,
    flags: JsonStore,
}

impl CommandSecretStore {
    pub fn new(
        list_command: impl Into<String>,
        get_command: impl Into<String>,
        flags: JsonStore,
    ) -> Self {
        Self {
            list_command: list_command.into(),
            get_command: get_command.into(),
            flags,
        }
    }

    async fn with_flags<T, F>(&self, f: F) -> Result<T, SecretError>
    where
        T: Send + 'static,
        F: FnOnce(JsonStore) -> Result<T, StorageError> + Send + 'static,
    {
        let flags = self.flags.clone();
        tokio::task::spawn_blocking(move || f(flags))
            .await
            .map_err(|e| SecretError::Backend(e.to_string()))?
            .map_err(|e| SecretError::Backend(e.to_string()))
    }

    async fn run(cmd: &str) -> Result<Option<Vec<u8>>, SecretError> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .output()
            .await
            .map_err(|e| SecretError::Backend(e.to_string()))?;
        if output.status.success() {
            return Ok(Some(output.stdout));
        }
        if output.status.code() == Some(EXIT_LOCKED) {
            return Err(SecretError::Locked);
        }
        Ok(None)
    }
}

#[async_trait]
impl SecretStoreAdapter for CommandSecretStore {
    async fn is_unlockable(&self) -> bool {
        Self::run(&self.list_command).await.is_ok()
    }

    async fn list_pending(&self) -> Result<Vec<ResourceId>, SecretError> {
        let Some(stdout) = Self::run(&self.list_command).await? else {
            return Err(SecretError::Backend("list command failed".to_string()));
        };
        let mut ids = Vec::new();
        for line in String::from_utf8_lossy(&stdout).lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<u32>() {
                Ok(id) => ids.push(ResourceId(id)),
                Err(_) => tracing::warn!(line, "skipping malformed resource id"),
            }
        }
        Ok(ids)
    }

    async fn get(&self, id: ResourceId) -> Result<Option<Secret>, SecretError> {
        let cmd = self.get_command.replace("{resource}", &id.0.to_string());
        let Some(stdout) = Self::run(&cmd).await? else {
            return Ok(None);
        };
        let value = String::from_utf8(stdout)
            .map_err(|_| SecretError::Backend("secret is not utf-8".to_string()))?;
        let value = value.trim_end_matches(['\r', '\n']);
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(Secret::new(value)))
    }

    async fn is_marked_invalid(&self, id: ResourceId) -> Result<bool, SecretError> {
        self.with_flags(move |flags| Ok(flags.is_secret_invalid(id)))
            .await
    }

    async fn mark_invalid(&self, id: ResourceId) -> Result<(), SecretError> {
        self.with_flags(move |flags| flags.mark_secret_invalid(id))
            .await
    }

    async fn mark_valid(&self, id: ResourceId) -> Result<(), SecretError> {
        self.with_flags(move |flags| flags.mark_secret_valid(id))
            .await
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
