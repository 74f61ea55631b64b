//! Reaction ledger model -> entity mapper

use scream_core::{DomainError, PostId, PseudonymousUser, ReactionEntry, ReactionKind};

use crate::models::ReactionModel;

/// Decode a stored `kind` column
pub fn kind_from_column(value: &str) -> Result<ReactionKind, DomainError> {
    ReactionKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value)
        .ok_or_else(|| DomainError::DatabaseError(format!("unknown reaction kind in ledger: {value}")))
}

impl TryFrom<ReactionModel> for ReactionEntry {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(ReactionEntry {
            post_id: PostId::new(model.post_id),
            user: PseudonymousUser::from_handle(model.user_hash),
            kind: kind_from_column(&model.kind)?,
        })
    }
}
