// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decrypted unlock codes held in memory for one wake cycle
//!
//! `Secret` is not `Serialize`, its `Debug`/`Display` output is redacted,
//! and every copy wipes its buffer when dropped.

use crate::resource::ResourceId;
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// A decrypted PIN
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The clear value, for handing to the SIM only
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Secret {}

impl Zeroize for Secret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// A resource paired with the secret that unlocks it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSecret {
    pub resource_id: ResourceId,
    pub secret: Secret,
}

impl PendingSecret {
    pub fn new(resource_id: ResourceId, secret: Secret) -> Self {
        Self {
            resource_id,
            secret,
        }
    }
}

#[cfg(test)]
#[path = "secret_tests.rs"]
mod tests;
