//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Real user ids arrive here and are hashed by the service before storage.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use scream_core::ChannelRef;

// ============================================================================
// Scream Requests
// ============================================================================

/// Submit a scream
///
/// `chat_id` and `message_id` name a message the caller already published.
/// When both are absent the service publishes the text itself.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_channel_ref_pair"))]
pub struct CreateScreamRequest {
    pub user_id: i64,

    /// Upper bound is the configured `MAX_POST_LENGTH`, checked when the post is built
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,

    pub chat_id: Option<i64>,

    pub message_id: Option<i64>,
}

impl CreateScreamRequest {
    /// Channel reference supplied by the caller, if any
    pub fn channel_ref(&self) -> Option<ChannelRef> {
        match (self.chat_id, self.message_id) {
            (Some(chat_id), Some(message_id)) => Some(ChannelRef::new(chat_id, message_id)),
            _ => None,
        }
    }
}

fn validate_channel_ref_pair(req: &CreateScreamRequest) -> Result<(), ValidationError> {
    if req.chat_id.is_some() == req.message_id.is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("channel_ref")
            .with_message("chat_id and message_id must be given together".into()))
    }
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Toggle a reaction; `kind` is a name (`fire`) or emoji (`🔥`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ToggleReactionRequest {
    pub user_id: i64,

    #[validate(length(min = 1, max = 32, message = "Kind must be 1-32 characters"))]
    pub kind: String,
}

// ============================================================================
// Admin Requests
// ============================================================================

/// Moderation delete of a channel message
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeletePostRequest {
    pub admin_id: i64,
}

/// Post a meme with the given text as caption
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostMemeRequest {
    pub admin_id: i64,

    #[validate(length(min = 1, max = 1024, message = "Text must be 1-1024 characters"))]
    pub text: String,
}

// ============================================================================
// Digest Queries
// ============================================================================

/// `?date=YYYY-MM-DD`, today (UTC) when absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyTopQuery {
    pub date: Option<NaiveDate>,
}

/// `?start=YYYY-MM-DD`, this week's Monday (UTC) when absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeeklyQuery {
    pub start: Option<NaiveDate>,
}
