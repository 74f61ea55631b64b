//! Salted one-way pseudonyms for real caller ids
//!
//! The raw platform user id never reaches storage. Every persisted
//! reference to a person is `hex(sha256(salt || decimal(id)))`.

use scream_core::PseudonymousUser;
use sha2::{Digest, Sha256};

/// Maps real user ids to stable pseudonyms under a deployment salt
#[derive(Clone)]
pub struct IdentityHasher {
    salt: String,
}

impl IdentityHasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Pseudonym for a real user id. Deterministic for a fixed salt.
    pub fn hash(&self, user_id: i64) -> PseudonymousUser {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(user_id.to_string().as_bytes());
        PseudonymousUser::from_handle(hex::encode(hasher.finalize()))
    }
}

impl std::fmt::Debug for IdentityHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityHasher").finish_non_exhaustive()
    }
}
