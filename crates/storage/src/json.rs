// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based storage
//!
//! One file per row: `<base>/rules/<id>.json`,
//! `<base>/resources/<id>.json` and `<base>/invalid-secrets/<id>.json`. Writes go through a temporary file and a
//! rename so a crash never leaves a half-written row.

use crate::records::{InvalidSecretRecord, ResourceRecord, RuleRecord};
use serde::{de::DeserializeOwned, Serialize};
use simsched_core::{ResourceId, ResourceState, RuleId, ScheduleRule};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const RULES: &str = "rules";
const RESOURCES: &str = "resources";
const INVALID_SECRETS: &str = "invalid-secrets";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("not found: {kind}/{id}")]
    NotFound { kind: &'static str, id: String },
}

/// JSON file-based storage
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_path: PathBuf,
}

impl JsonStore {
    /// Open a store at the given path, creating it if needed
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(base_path.join(RULES))?;
        fs::create_dir_all(base_path.join(RESOURCES))?;
        fs::create_dir_all(base_path.join(INVALID_SECRETS))?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    // Rules

    pub fn save_rule(&self, rule: &ScheduleRule) -> Result<(), StorageError> {
        self.save(RULES, &rule.id.0.to_string(), &RuleRecord::from(rule))
    }

    /// Write a raw row as-is (import path, tests)
    pub fn save_rule_record(&self, row: &RuleRecord) -> Result<(), StorageError> {
        self.save(RULES, &row.id.to_string(), row)
    }

    pub fn delete_rule(&self, id: RuleId) -> Result<(), StorageError> {
        self.delete(RULES, &id.0.to_string())
    }

    /// All readable rule rows, ordered by id.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn load_rule_records(&self) -> Result<Vec<RuleRecord>, StorageError> {
        let mut rows: Vec<RuleRecord> = self.load_all(RULES)?;
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    // Resources

    pub fn save_resource(&self, state: &ResourceState) -> Result<(), StorageError> {
        self.save(
            RESOURCES,
            &state.resource_id.0.to_string(),
            &ResourceRecord::from(state),
        )
    }

    pub fn load_resource(&self, id: ResourceId) -> Result<ResourceState, StorageError> {
        let row: ResourceRecord = self.load(RESOURCES, &id.0.to_string())?;
        Ok(row.into())
    }

    pub fn delete_resource(&self, id: ResourceId) -> Result<(), StorageError> {
        self.delete(RESOURCES, &id.0.to_string())
    }

    /// All readable resources, ordered by id
    pub fn list_resources(&self) -> Result<Vec<ResourceState>, StorageError> {
        let mut rows: Vec<ResourceRecord> = self.load_all(RESOURCES)?;
        rows.sort_by_key(|row| row.id);
        Ok(rows.into_iter().map(ResourceState::from).collect())
    }

    // Secret flags

    pub fn mark_secret_invalid(&self, id: ResourceId) -> Result<(), StorageError> {
        self.save(
            INVALID_SECRETS,
            &id.0.to_string(),
            &InvalidSecretRecord { resource_id: id.0 },
        )
    }

    pub fn mark_secret_valid(&self, id: ResourceId) -> Result<(), StorageError> {
        self.delete(INVALID_SECRETS, &id.0.to_string())
    }

    pub fn is_secret_invalid(&self, id: ResourceId) -> bool {
        self.path_for(INVALID_SECRETS, &id.0.to_string()).exists()
    }

    // Generic row access

    fn save<T: Serialize>(&self, kind: &str, id: &str, data: &T) -> Result<(), StorageError> {
        let path = self.path_for(kind, id);
        let json = serde_json::to_string_pretty(data).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, kind: &'static str, id: &str) -> Result<T, StorageError> {
        let path = self.path_for(kind, id);
        if !path.exists() {
            return Err(StorageError::NotFound {
                kind,
                id: id.to_string(),
            });
        }
        read_json(&path)
    }

    fn delete(&self, kind: &str, id: &str) -> Result<(), StorageError> {
        let path = self.path_for(kind, id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn load_all<T: DeserializeOwned>(&self, kind: &str) -> Result<Vec<T>, StorageError> {
        let dir = self.base_path.join(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            match read_json(&path) {
                Ok(row) => rows.push(row),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable row"),
            }
        }
        Ok(rows)
    }

    fn path_for(&self, kind: &str, id: &str) -> PathBuf {
        self.base_path.join(kind).join(format!("{}.json", id))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
