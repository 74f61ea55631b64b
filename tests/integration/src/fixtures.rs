//! Test fixtures and data generators
//!
//! Request bodies the tests send and the response shapes they expect.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicI64 = AtomicI64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> i64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A real user id no other test uses
pub fn unique_user() -> i64 {
    1_000_000 + unique_suffix()
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateScreamRequest {
    pub user_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i64>,
}

impl CreateScreamRequest {
    /// Scream the server publishes itself
    pub fn publish(user_id: i64, text: &str) -> Self {
        Self {
            user_id,
            text: text.to_string(),
            chat_id: None,
            message_id: None,
        }
    }

    /// Scream already sitting at a unique channel message
    pub fn at_message(user_id: i64, text: &str) -> Self {
        Self {
            user_id,
            text: text.to_string(),
            chat_id: Some(crate::helpers::TEST_CHANNEL),
            message_id: Some(unique_suffix() + 10_000),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleReactionRequest {
    pub user_id: i64,
    pub kind: String,
}

impl ToggleReactionRequest {
    pub fn new(user_id: i64, kind: &str) -> Self {
        Self {
            user_id,
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletePostRequest {
    pub admin_id: i64,
}

#[derive(Debug, Serialize)]
pub struct PostMemeRequest {
    pub admin_id: i64,
    pub text: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatedScream {
    pub post_id: i64,
    pub text: String,
    pub chat_id: i64,
    pub message_id: i64,
}

impl CreatedScream {
    /// Path of the channel message, for moderation deletes
    pub fn message_path(&self) -> String {
        format!("/api/v1/channels/{}/messages/{}", self.chat_id, self.message_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Counts {
    pub skull: i64,
    pub fire: i64,
    pub clown: i64,
}

impl Counts {
    pub const fn new(skull: i64, fire: i64, clown: i64) -> Self {
        Self { skull, fire, clown }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostView {
    pub post_id: i64,
    pub text: String,
    pub reactions: Counts,
    pub votes: i64,
    pub chat_id: i64,
    pub message_id: i64,
    pub is_deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteOutcome {
    pub outcome: String,
    pub post_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Weekly {
    pub start: String,
    pub end: String,
    pub labels: Vec<String>,
    pub counts: Vec<i64>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserStats {
    pub post_count: i64,
    pub week: Weekly,
    pub chart_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopPost {
    pub post_id: i64,
    pub text: String,
    pub votes: i64,
}

#[derive(Debug, Deserialize)]
pub struct DailyTop {
    pub date: String,
    pub top: Option<TopPost>,
}

#[derive(Debug, Deserialize)]
pub struct PublishedMessage {
    pub chat_id: i64,
    pub message_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}
