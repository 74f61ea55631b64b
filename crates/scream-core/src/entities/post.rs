//! Post entity - one anonymous scream published to the shared channel

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::value_objects::{ChannelRef, PostId, PseudonymousUser, ReactionCounts};

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author: PseudonymousUser,
    pub text: String,
    /// Denormalized cache of the reaction ledger for this post
    pub counts: ReactionCounts,
    pub channel_ref: ChannelRef,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl Post {
    /// Sum of all reactions
    #[inline]
    pub fn votes(&self) -> i64 {
        self.counts.total()
    }

    /// Check if a pseudonymous user authored this post
    #[inline]
    pub fn is_author(&self, user: &PseudonymousUser) -> bool {
        &self.author == user
    }
}

/// Validated input for post creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: PseudonymousUser,
    pub text: String,
    pub channel_ref: ChannelRef,
}

impl NewPost {
    /// Validate text and build a creation request.
    ///
    /// Surrounding whitespace is trimmed; the result must be non-empty and at
    /// most `max_chars` characters.
    pub fn new(
        author: PseudonymousUser,
        text: &str,
        channel_ref: ChannelRef,
        max_chars: usize,
    ) -> Result<Self, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::EmptyText);
        }
        if text.chars().count() > max_chars {
            return Err(DomainError::TextTooLong { max: max_chars });
        }
        Ok(Self {
            author,
            text: text.to_string(),
            channel_ref,
        })
    }
}

/// Summary of the most-reacted post of a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPost {
    pub post_id: PostId,
    pub text: String,
    pub votes: i64,
    pub channel_ref: ChannelRef,
}

/// Result of a soft-delete request. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SoftDeleteOutcome {
    /// Post was live and is now hidden; author's count decremented
    Deleted { post_id: PostId },
    /// Post was already hidden; nothing changed
    AlreadyDeleted { post_id: PostId },
    /// No post is published at that channel reference
    NotFound,
}

impl SoftDeleteOutcome {
    /// Whether this call changed stored state
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }
}
