// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration file

use crate::lifecycle::LifecycleError;
use serde::Deserialize;
use simsched_engine::EngineConfig;
use std::path::{Path, PathBuf};

/// File name looked up in the state directory when no path is given
pub const CONFIG_FILE_NAME: &str = "simsched.toml";

/// On-disk form; every field is optional so defaults can depend on `state_dir`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    state_dir: Option<PathBuf>,
    log_path: Option<PathBuf>,
    lock_path: Option<PathBuf>,
    activate_command: Option<String>,
    probe_command: Option<String>,
    call_state_command: Option<String>,
    secret_list_command: Option<String>,
    secret_get_command: Option<String>,
    sim_status_command: Option<String>,
    sim_supply_command: Option<String>,
    #[serde(default)]
    engine: EngineConfig,
}

/// Resolved daemon configuration
///
/// Helper commands default to ones that report nothing to do: no call in
/// progress, no stored secrets, no locked SIMs.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub log_path: PathBuf,
    pub lock_path: PathBuf,
    /// Directory of the JSON rule and resource store
    pub store_path: PathBuf,
    /// `sh -c` template with `{resource}`, `{state}` and `{keep}`
    pub activate_command: String,
    /// Exit 0 when the platform keeps disabled SIMs off across reboots
    pub probe_command: Option<String>,
    /// Exit 0 while a call is in progress
    pub call_state_command: String,
    pub secret_list_command: String,
    pub secret_get_command: String,
    pub sim_status_command: String,
    pub sim_supply_command: String,
    pub engine: EngineConfig,
}

impl Config {
    /// Load from `path`, or from `simsched.toml` in the default state directory
    pub fn load(path: Option<&Path>) -> Result<Self, LifecycleError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_state_dir()?.join(CONFIG_FILE_NAME),
        };
        let text = std::fs::read_to_string(&path)
            .map_err(|e| LifecycleError::ConfigNotFound(path.clone(), e))?;
        let fallback_state_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => default_state_dir()?,
        };
        Self::parse(&text, &fallback_state_dir)
    }

    /// Parse TOML text; `state_dir` defaults to `fallback_state_dir`
    pub fn parse(text: &str, fallback_state_dir: &Path) -> Result<Self, LifecycleError> {
        let file: ConfigFile = toml::from_str(text)?;
        let state_dir = file
            .state_dir
            .unwrap_or_else(|| fallback_state_dir.to_path_buf());
        let activate_command = file
            .activate_command
            .ok_or(LifecycleError::MissingSetting("activate_command"))?;

        Ok(Self {
            log_path: file
                .log_path
                .unwrap_or_else(|| state_dir.join("simschedd.log")),
            lock_path: file
                .lock_path
                .unwrap_or_else(|| state_dir.join("simschedd.pid")),
            store_path: state_dir.join("store"),
            activate_command,
            probe_command: file.probe_command,
            call_state_command: file.call_state_command.unwrap_or_else(|| "false".into()),
            secret_list_command: file.secret_list_command.unwrap_or_else(|| "true".into()),
            secret_get_command: file.secret_get_command.unwrap_or_else(|| "false".into()),
            sim_status_command: file.sim_status_command.unwrap_or_else(|| "true".into()),
            sim_supply_command: file.sim_supply_command.unwrap_or_else(|| "exit 4".into()),
            engine: file.engine,
            state_dir,
        })
    }
}

/// `$XDG_STATE_HOME/simsched`, else `~/.local/state/simsched`
pub fn default_state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("simsched"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/simsched"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
