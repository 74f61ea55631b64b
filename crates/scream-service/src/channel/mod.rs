//! Channel publishing capability
//!
//! Screams and digests end up in one shared broadcast channel. A
//! [`ChannelPublisher`] posts text or photos there, keeps the reaction
//! buttons under each scream current, and removes messages when a post is
//! moderated away.

mod log;
mod telegram;

use async_trait::async_trait;
use scream_core::{ChannelRef, PostId, ReactionCounts};

pub use log::{LogChannel, Published};
pub use telegram::TelegramChannel;

use crate::services::ServiceResult;

/// Posts into the shared channel
#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// Post a text message, returning where it landed
    async fn send_text(&self, text: &str) -> ServiceResult<ChannelRef>;

    /// Post a scream with zeroed reaction buttons
    ///
    /// The buttons are not bound to a post yet; [`Self::edit_reactions`]
    /// binds them once the post is stored.
    async fn send_scream(&self, text: &str) -> ServiceResult<ChannelRef> {
        self.send_text(text).await
    }

    /// Rewrite the reaction buttons under a published scream
    async fn edit_reactions(
        &self,
        channel_ref: ChannelRef,
        post_id: PostId,
        counts: ReactionCounts,
    ) -> ServiceResult<()>;

    /// Post an image by URL with a caption
    async fn send_photo(&self, url: &str, caption: &str) -> ServiceResult<ChannelRef>;

    /// Remove a previously published message
    async fn delete_message(&self, channel_ref: ChannelRef) -> ServiceResult<()>;
}
