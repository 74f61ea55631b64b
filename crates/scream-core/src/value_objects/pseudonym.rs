//! Pseudonymous user handle
//!
//! Raw caller identities never reach the store. The identity hasher in
//! `scream-common` derives one of these from a real id and a secret salt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, one-way derived stand-in for a real caller identity
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PseudonymousUser(String);

impl PseudonymousUser {
    /// Wrap an already-derived handle (e.g. read back from storage)
    pub fn from_handle(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Short prefix safe to put in logs
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(8).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

// Keep full handles out of debug output
impl fmt::Debug for PseudonymousUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PseudonymousUser({}…)", self.short())
    }
}

impl fmt::Display for PseudonymousUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}
