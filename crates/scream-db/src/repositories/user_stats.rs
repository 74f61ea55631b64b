//! PostgreSQL implementation of UserStatsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use scream_core::{PseudonymousUser, RepoResult, UserAggregate, UserStatsRepository};

use crate::models::UserStatsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of UserStatsRepository
#[derive(Clone)]
pub struct PgUserStatsRepository {
    pool: PgPool,
}

impl PgUserStatsRepository {
    /// Create a new PgUserStatsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStatsRepository for PgUserStatsRepository {
    #[instrument(skip(self))]
    async fn find(&self, user: &PseudonymousUser) -> RepoResult<Option<UserAggregate>> {
        let result = sqlx::query_as::<_, UserStatsModel>(
            "SELECT user_hash, post_count FROM user_stats WHERE user_hash = $1",
        )
        .bind(user.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UserAggregate::from))
    }
}
