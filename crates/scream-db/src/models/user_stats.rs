//! User aggregate database model

use sqlx::FromRow;

/// Database model for user_stats table
#[derive(Debug, Clone, FromRow)]
pub struct UserStatsModel {
    pub user_hash: String,
    pub post_count: i64,
}
