//! Scream service
//!
//! Posting, reactions, moderation deletes, and the read-side aggregates.
//! Real user ids are hashed on entry; nothing below this layer sees them.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use scream_core::{
    weekly_histogram, ChannelRef, DomainError, NewPost, Post, PostId, ReactionCounts,
    ReactionKind, SoftDeleteOutcome, TopPost, WeekWindow,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Scream service
pub struct ScreamService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ScreamService<'a> {
    /// Create a new ScreamService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Posts
    // ========================================================================

    /// Record a post already published at `channel_ref`
    #[instrument(skip(self, user_id, text))]
    pub async fn create_post(
        &self,
        user_id: i64,
        text: &str,
        channel_ref: ChannelRef,
    ) -> ServiceResult<Post> {
        let new = self.new_post(user_id, text, channel_ref)?;
        self.store(new).await
    }

    /// Publish the text to the channel, then record it
    ///
    /// If recording fails the channel message is withdrawn again. Once
    /// recorded, the reaction buttons are bound to the new post id.
    #[instrument(skip(self, user_id, text))]
    pub async fn publish(&self, user_id: i64, text: &str) -> ServiceResult<Post> {
        // Validate before anything reaches the channel
        let mut new = self.new_post(user_id, text, ChannelRef::new(0, 0))?;
        new.channel_ref = self.ctx.channel().send_scream(&new.text).await?;

        let channel_ref = new.channel_ref;
        match self.store(new).await {
            Ok(post) => {
                self.refresh_buttons(&post).await;
                Ok(post)
            }
            Err(err) => {
                if let Err(cleanup) = self.ctx.channel().delete_message(channel_ref).await {
                    warn!(%channel_ref, error = %cleanup, "Failed to withdraw unrecorded message");
                }
                Err(err)
            }
        }
    }

    /// [`Self::create_post`] when the caller names a message, [`Self::publish`] otherwise
    pub async fn submit(
        &self,
        user_id: i64,
        text: &str,
        channel_ref: Option<ChannelRef>,
    ) -> ServiceResult<Post> {
        match channel_ref {
            Some(channel_ref) => self.create_post(user_id, text, channel_ref).await,
            None => self.publish(user_id, text).await,
        }
    }

    /// Get a post by id, deleted or not
    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: PostId) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(post_id).into())
    }

    /// Soft delete the post published at `channel_ref`
    ///
    /// Not-found and already-deleted are reported through the outcome, not
    /// as errors.
    #[instrument(skip(self))]
    pub async fn soft_delete_post(&self, channel_ref: ChannelRef) -> ServiceResult<SoftDeleteOutcome> {
        let outcome = self.ctx.post_repo().soft_delete(channel_ref).await?;
        match outcome {
            SoftDeleteOutcome::Deleted { post_id } => info!(%post_id, %channel_ref, "Post deleted"),
            SoftDeleteOutcome::AlreadyDeleted { post_id } => {
                warn!(%post_id, %channel_ref, "Post already deleted")
            }
            SoftDeleteOutcome::NotFound => warn!(%channel_ref, "No post to delete"),
        }
        Ok(outcome)
    }

    /// Admin-only delete that also removes the channel message
    ///
    /// The channel removal is best effort; the soft delete stands either way.
    #[instrument(skip(self, admin_id))]
    pub async fn moderate_delete(
        &self,
        admin_id: i64,
        channel_ref: ChannelRef,
    ) -> ServiceResult<SoftDeleteOutcome> {
        self.require_admin(admin_id, "delete posts")?;

        let outcome = self.soft_delete_post(channel_ref).await?;
        if outcome.changed() {
            if let Err(err) = self.ctx.channel().delete_message(channel_ref).await {
                warn!(%channel_ref, error = %err, "Failed to remove channel message");
            }
        }
        Ok(outcome)
    }

    // ========================================================================
    // Reactions
    // ========================================================================

    /// Toggle `kind` for the user on a post, returning the new counters
    #[instrument(skip(self, user_id))]
    pub async fn toggle_reaction(
        &self,
        post_id: PostId,
        user_id: i64,
        kind: &str,
    ) -> ServiceResult<ReactionCounts> {
        let kind = ReactionKind::parse(kind)?;
        let user = self.ctx.hasher().hash(user_id);

        let counts = self.ctx.reaction_repo().toggle(post_id, &user, kind).await?;
        info!(%post_id, %kind, user = user.short(), "Reaction toggled");

        match self.ctx.post_repo().find_by_id(post_id).await {
            Ok(Some(post)) if !post.is_deleted => self.refresh_buttons(&post).await,
            Ok(_) => {}
            Err(err) => warn!(%post_id, error = %err, "Skipping button refresh"),
        }
        Ok(counts)
    }

    /// The user's active reaction on a post, if any
    #[instrument(skip(self, user_id))]
    pub async fn current_reaction(
        &self,
        post_id: PostId,
        user_id: i64,
    ) -> ServiceResult<Option<ReactionKind>> {
        let user = self.ctx.hasher().hash(user_id);
        Ok(self.ctx.reaction_repo().find(post_id, &user).await?)
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Live posts the user has made
    #[instrument(skip(self, user_id))]
    pub async fn user_post_count(&self, user_id: i64) -> ServiceResult<i64> {
        let user = self.ctx.hasher().hash(user_id);
        Ok(self.ctx.user_stats_repo().post_count(&user).await?)
    }

    /// Highest-voted live post created on `day` (UTC), lowest id on ties
    #[instrument(skip(self))]
    pub async fn top_post_of_day(&self, day: NaiveDate) -> ServiceResult<Option<TopPost>> {
        Ok(self.ctx.post_repo().top_of_day(day).await?)
    }

    /// Live posts per day for the seven days starting at `start`
    #[instrument(skip(self))]
    pub async fn weekly_counts(&self, start: NaiveDate) -> ServiceResult<[i64; 7]> {
        let week = WeekWindow::starting(start);
        let rows = self
            .ctx
            .post_repo()
            .daily_counts(week.start(), week.end())
            .await?;
        Ok(weekly_histogram(week.start(), &rows))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Fail with `PermissionDenied` unless `user_id` is a configured admin
    pub fn require_admin(&self, user_id: i64, operation: &str) -> ServiceResult<()> {
        if self.ctx.is_admin(user_id) {
            Ok(())
        } else {
            Err(ServiceError::permission_denied(operation))
        }
    }

    fn new_post(&self, user_id: i64, text: &str, channel_ref: ChannelRef) -> ServiceResult<NewPost> {
        let author = self.ctx.hasher().hash(user_id);
        Ok(NewPost::new(author, text, channel_ref, self.ctx.max_post_length())?)
    }

    /// Best effort: the counters are already committed
    async fn refresh_buttons(&self, post: &Post) {
        if let Err(err) = self
            .ctx
            .channel()
            .edit_reactions(post.channel_ref, post.id, post.counts)
            .await
        {
            warn!(post_id = %post.id, channel_ref = %post.channel_ref, error = %err, "Failed to update reaction buttons");
        }
    }

    async fn store(&self, new: NewPost) -> ServiceResult<Post> {
        let post_id = self.ctx.post_repo().create(&new).await?;
        info!(%post_id, channel_ref = %new.channel_ref, author = new.author.short(), "Post created");
        self.get_post(post_id).await
    }
}
