//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.
//!
//! Every mutating method is one atomic unit of work against the store: an
//! implementation must either apply all of its writes or none of them.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{NewPost, Post, ReactionEntry, SoftDeleteOutcome, TopPost, UserAggregate};
use crate::error::DomainError;
use crate::value_objects::{ChannelRef, PostId, PseudonymousUser, ReactionCounts, ReactionKind};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post with zeroed counters and bump the author's post count,
    /// atomically. Returns the newly assigned id.
    async fn create(&self, post: &NewPost) -> RepoResult<PostId>;

    /// Find post by ID (including soft-deleted posts)
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>>;

    /// Find post by the channel message it was published as
    async fn find_by_channel_ref(&self, channel_ref: ChannelRef) -> RepoResult<Option<Post>>;

    /// Hide a post and decrement its author's post count, atomically.
    /// Already-deleted and unknown posts are no-ops.
    async fn soft_delete(&self, channel_ref: ChannelRef) -> RepoResult<SoftDeleteOutcome>;

    /// Most-reacted live post created on `day` (UTC); ties go to the lowest id
    async fn top_of_day(&self, day: NaiveDate) -> RepoResult<Option<TopPost>>;

    /// Live post counts per UTC day for `from..=to`; days without posts are omitted
    async fn daily_counts(&self, from: NaiveDate, to: NaiveDate) -> RepoResult<Vec<(NaiveDate, i64)>>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Run the reaction state machine for `(post_id, user)`: add, remove or
    /// switch the ledger row and adjust the post's counters in one
    /// transaction. Concurrent toggles on the same post serialize.
    ///
    /// Returns the post's counters as committed.
    async fn toggle(
        &self,
        post_id: PostId,
        user: &PseudonymousUser,
        kind: ReactionKind,
    ) -> RepoResult<ReactionCounts>;

    /// Current active reaction of a user on a post
    async fn find(&self, post_id: PostId, user: &PseudonymousUser) -> RepoResult<Option<ReactionKind>>;

    /// All ledger rows for a post
    async fn find_by_post(&self, post_id: PostId) -> RepoResult<Vec<ReactionEntry>>;

    /// Counters recomputed from the ledger (for consistency checks)
    async fn count_from_ledger(&self, post_id: PostId) -> RepoResult<ReactionCounts>;
}

// ============================================================================
// User Stats Repository
// ============================================================================

#[async_trait]
pub trait UserStatsRepository: Send + Sync {
    /// Find the aggregate row for a user
    async fn find(&self, user: &PseudonymousUser) -> RepoResult<Option<UserAggregate>>;

    /// Post count for a user, 0 if the user never posted
    async fn post_count(&self, user: &PseudonymousUser) -> RepoResult<i64> {
        Ok(self.find(user).await?.map_or(0, |agg| agg.post_count))
    }
}
