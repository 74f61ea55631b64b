//! Post database models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub post_id: i64,
    pub user_hash: String,
    pub text: String,
    pub skull: i64,
    pub fire: i64,
    pub clown: i64,
    pub chat_id: i64,
    pub message_id: i64,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Counter columns only (returned by the toggle update)
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CountersModel {
    pub skull: i64,
    pub fire: i64,
    pub clown: i64,
}

/// Projection used by the daily top query
#[derive(Debug, Clone, FromRow)]
pub struct TopPostModel {
    pub post_id: i64,
    pub text: String,
    pub votes: i64,
    pub chat_id: i64,
    pub message_id: i64,
}

/// Aggregated posts per UTC day (from query)
#[derive(Debug, Clone, Copy, FromRow)]
pub struct DailyCountModel {
    pub day: NaiveDate,
    pub count: i64,
}
