// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Persisted row formats and JSON file storage for simsched

mod json;
mod records;

pub use json::{JsonStore, StorageError};
pub use records::{InvalidRule, InvalidSecretRecord, ResourceRecord, RuleRecord};
