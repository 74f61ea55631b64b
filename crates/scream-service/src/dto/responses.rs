//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Author
//! pseudonyms are never part of a response.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use scream_core::{weekly_labels, ChannelRef, Post, PostId, ReactionCounts, TopPost, WeekWindow};

// ============================================================================
// Scream Responses
// ============================================================================

/// Result of submitting a scream
#[derive(Debug, Clone, Serialize)]
pub struct CreatedScreamResponse {
    pub post_id: i64,
    pub text: String,
    pub chat_id: i64,
    pub message_id: i64,
}

impl CreatedScreamResponse {
    pub fn new(post_id: PostId, text: String, channel_ref: ChannelRef) -> Self {
        Self {
            post_id: post_id.into_inner(),
            text,
            chat_id: channel_ref.chat_id,
            message_id: channel_ref.message_id,
        }
    }
}

/// Counters in the fixed skull, fire, clown order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionCountsResponse {
    pub skull: i64,
    pub fire: i64,
    pub clown: i64,
}

impl From<ReactionCounts> for ReactionCountsResponse {
    fn from(counts: ReactionCounts) -> Self {
        Self {
            skull: counts.skull,
            fire: counts.fire,
            clown: counts.clown,
        }
    }
}

/// Single post view
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub post_id: i64,
    pub text: String,
    pub reactions: ReactionCountsResponse,
    pub votes: i64,
    pub chat_id: i64,
    pub message_id: i64,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.id.into_inner(),
            votes: post.votes(),
            reactions: post.counts.into(),
            text: post.text,
            chat_id: post.channel_ref.chat_id,
            message_id: post.channel_ref.message_id,
            created_at: post.created_at,
            is_deleted: post.is_deleted,
        }
    }
}

// ============================================================================
// Aggregate Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TopPostResponse {
    pub post_id: i64,
    pub text: String,
    pub votes: i64,
    pub chat_id: i64,
    pub message_id: i64,
}

impl From<TopPost> for TopPostResponse {
    fn from(top: TopPost) -> Self {
        Self {
            post_id: top.post_id.into_inner(),
            text: top.text,
            votes: top.votes,
            chat_id: top.channel_ref.chat_id,
            message_id: top.channel_ref.message_id,
        }
    }
}

/// Top post of a day; `top` is null on a quiet day
#[derive(Debug, Clone, Serialize)]
pub struct DailyTopResponse {
    pub date: NaiveDate,
    pub top: Option<TopPostResponse>,
}

/// Seven per-day counts with their weekday labels
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyCountsResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub labels: Vec<String>,
    pub counts: [i64; 7],
    pub total: i64,
}

impl WeeklyCountsResponse {
    pub fn new(week: WeekWindow, counts: [i64; 7]) -> Self {
        Self {
            start: week.start(),
            end: week.end(),
            labels: weekly_labels(week.start()),
            total: counts.iter().sum(),
            counts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserStatsResponse {
    pub post_count: i64,
    pub week: WeeklyCountsResponse,
    /// Bar chart of `week`, null when no chart renderer is configured
    pub chart_url: Option<String>,
}

/// Where a message landed in the channel
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PublishedResponse {
    pub chat_id: i64,
    pub message_id: i64,
}

impl From<ChannelRef> for PublishedResponse {
    fn from(channel_ref: ChannelRef) -> Self {
        Self {
            chat_id: channel_ref.chat_id,
            message_id: channel_ref.message_id,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool) -> Self {
        Self {
            status: if storage_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
