//! Reaction ledger entry - the authoritative record of a user's active reaction

use crate::value_objects::{PostId, PseudonymousUser, ReactionKind};

/// One row of the reaction ledger.
///
/// Keyed by `(post_id, user)`; a pair has at most one row, so a user has at
/// most one active reaction per post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEntry {
    pub post_id: PostId,
    pub user: PseudonymousUser,
    pub kind: ReactionKind,
}

impl ReactionEntry {
    pub fn new(post_id: PostId, user: PseudonymousUser, kind: ReactionKind) -> Self {
        Self { post_id, user, kind }
    }
}
