//! Telegram Bot API channel

use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use scream_core::{ChannelRef, PostId, ReactionCounts, ReactionKind};

use super::ChannelPublisher;
use crate::render::RENDER_TIMEOUT;
use crate::services::{ServiceError, ServiceResult};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Bot API envelope: `{ ok, result, description }`
#[derive(Debug, Deserialize)]
struct BotResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct InlineKeyboardButton {
    text: String,
    callback_data: String,
}

#[derive(Serialize)]
struct EditMessageReplyMarkup {
    chat_id: i64,
    message_id: i64,
    reply_markup: InlineKeyboardMarkup,
}

/// One row of `"{emoji} {count}"` buttons with `react_{emoji}_{post}` callbacks
///
/// Before the post is stored the callbacks carry `tmp` instead of an id.
fn reaction_keyboard(post_id: Option<PostId>, counts: ReactionCounts) -> InlineKeyboardMarkup {
    let target = post_id.map_or_else(|| "tmp".to_string(), |id| id.to_string());
    let row = ReactionKind::ALL
        .into_iter()
        .map(|kind| InlineKeyboardButton {
            text: format!("{} {}", kind.emoji(), counts.get(kind)),
            callback_data: format!("react_{}_{target}", kind.emoji()),
        })
        .collect();
    InlineKeyboardMarkup {
        inline_keyboard: vec![row],
    }
}

#[derive(Serialize)]
struct SendPhoto<'a> {
    chat_id: i64,
    photo: &'a str,
    caption: &'a str,
}

#[derive(Serialize)]
struct DeleteMessage {
    chat_id: i64,
    message_id: i64,
}

/// Publishes through a bot that is an admin of the channel
#[derive(Clone)]
pub struct TelegramChannel {
    client: reqwest::Client,
    token: String,
    channel_id: i64,
}

impl TelegramChannel {
    pub fn new(token: impl Into<String>, channel_id: i64) -> ServiceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(RENDER_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::internal(format!("http client: {e}")))?;
        Ok(Self {
            client,
            token: token.into(),
            channel_id,
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> ServiceResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{TELEGRAM_API_BASE}/bot{}/{method}", self.token);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            // reqwest errors embed the URL, which carries the token
            .map_err(|e| ServiceError::external(format!("{method}: {}", e.without_url())))?;

        let envelope: BotResponse<T> = response
            .json()
            .await
            .map_err(|e| ServiceError::external(format!("{method}: {}", e.without_url())))?;

        match envelope {
            BotResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            BotResponse { description, .. } => Err(ServiceError::external(format!(
                "{method}: {}",
                description.unwrap_or_else(|| "request rejected".to_string())
            ))),
        }
    }
}

#[async_trait]
impl ChannelPublisher for TelegramChannel {
    #[instrument(skip(self, text))]
    async fn send_text(&self, text: &str) -> ServiceResult<ChannelRef> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id: self.channel_id,
                    text,
                    reply_markup: None,
                },
            )
            .await?;
        let channel_ref = ChannelRef::new(self.channel_id, sent.message_id);
        info!(%channel_ref, "Message sent");
        Ok(channel_ref)
    }

    #[instrument(skip(self, text))]
    async fn send_scream(&self, text: &str) -> ServiceResult<ChannelRef> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id: self.channel_id,
                    text,
                    reply_markup: Some(reaction_keyboard(None, ReactionCounts::default())),
                },
            )
            .await?;
        let channel_ref = ChannelRef::new(self.channel_id, sent.message_id);
        info!(%channel_ref, "Scream sent");
        Ok(channel_ref)
    }

    #[instrument(skip(self))]
    async fn edit_reactions(
        &self,
        channel_ref: ChannelRef,
        post_id: PostId,
        counts: ReactionCounts,
    ) -> ServiceResult<()> {
        // Result is the edited message, or `true` for inline messages
        let _: IgnoredAny = self
            .call(
                "editMessageReplyMarkup",
                &EditMessageReplyMarkup {
                    chat_id: channel_ref.chat_id,
                    message_id: channel_ref.message_id,
                    reply_markup: reaction_keyboard(Some(post_id), counts),
                },
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self, caption))]
    async fn send_photo(&self, url: &str, caption: &str) -> ServiceResult<ChannelRef> {
        let sent: SentMessage = self
            .call(
                "sendPhoto",
                &SendPhoto {
                    chat_id: self.channel_id,
                    photo: url,
                    caption,
                },
            )
            .await?;
        let channel_ref = ChannelRef::new(self.channel_id, sent.message_id);
        info!(%channel_ref, "Photo sent");
        Ok(channel_ref)
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, channel_ref: ChannelRef) -> ServiceResult<()> {
        let _: bool = self
            .call(
                "deleteMessage",
                &DeleteMessage {
                    chat_id: channel_ref.chat_id,
                    message_id: channel_ref.message_id,
                },
            )
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramChannel")
            .field("channel_id", &self.channel_id)
            .finish_non_exhaustive()
    }
}
