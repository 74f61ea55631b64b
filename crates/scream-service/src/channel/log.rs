//! Channel that only logs and remembers what it was asked to publish

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use scream_core::{ChannelRef, PostId, ReactionCounts};

use super::ChannelPublisher;
use crate::services::ServiceResult;

/// One call made against a [`LogChannel`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    Text { channel_ref: ChannelRef, text: String },
    Photo { channel_ref: ChannelRef, url: String, caption: String },
    Reactions {
        channel_ref: ChannelRef,
        post_id: PostId,
        counts: ReactionCounts,
    },
    Deleted(ChannelRef),
}

/// Stand-in channel used when no bot token is configured
#[derive(Debug, Clone)]
pub struct LogChannel {
    channel_id: i64,
    last_message_id: Arc<AtomicI64>,
    published: Arc<Mutex<Vec<Published>>>,
}

impl LogChannel {
    pub fn new(channel_id: i64) -> Self {
        Self {
            channel_id,
            last_message_id: Arc::new(AtomicI64::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Everything published so far, oldest first
    pub async fn published(&self) -> Vec<Published> {
        self.published.lock().await.clone()
    }

    fn next_ref(&self) -> ChannelRef {
        let message_id = self.last_message_id.fetch_add(1, Ordering::SeqCst) + 1;
        ChannelRef::new(self.channel_id, message_id)
    }
}

#[async_trait]
impl ChannelPublisher for LogChannel {
    async fn send_text(&self, text: &str) -> ServiceResult<ChannelRef> {
        let channel_ref = self.next_ref();
        info!(%channel_ref, chars = text.chars().count(), "Channel text");
        self.published.lock().await.push(Published::Text {
            channel_ref,
            text: text.to_string(),
        });
        Ok(channel_ref)
    }

    async fn send_photo(&self, url: &str, caption: &str) -> ServiceResult<ChannelRef> {
        let channel_ref = self.next_ref();
        info!(%channel_ref, url, "Channel photo");
        self.published.lock().await.push(Published::Photo {
            channel_ref,
            url: url.to_string(),
            caption: caption.to_string(),
        });
        Ok(channel_ref)
    }

    async fn edit_reactions(
        &self,
        channel_ref: ChannelRef,
        post_id: PostId,
        counts: ReactionCounts,
    ) -> ServiceResult<()> {
        info!(%channel_ref, %post_id, votes = counts.total(), "Channel reactions");
        self.published.lock().await.push(Published::Reactions {
            channel_ref,
            post_id,
            counts,
        });
        Ok(())
    }

    async fn delete_message(&self, channel_ref: ChannelRef) -> ServiceResult<()> {
        info!(%channel_ref, "Channel delete");
        self.published.lock().await.push(Published::Deleted(channel_ref));
        Ok(())
    }
}
