//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use scream_core::{
    day_bounds, ChannelRef, DomainError, NewPost, Post, PostId, PostRepository, RepoResult,
    SoftDeleteOutcome, TopPost,
};

use crate::models::{DailyCountModel, PostModel, TopPostModel};

use super::error::{map_db_error, map_unique_violation};

const POST_COLUMNS: &str =
    "post_id, user_hash, text, skull, fire, clown, chat_id, message_id, created_at, is_deleted";

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self, post), fields(author = %post.author, channel_ref = %post.channel_ref))]
    async fn create(&self, post: &NewPost) -> RepoResult<PostId> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let post_id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO posts (user_hash, text, chat_id, message_id)
            VALUES ($1, $2, $3, $4)
            RETURNING post_id
            ",
        )
        .bind(post.author.as_str())
        .bind(&post.text)
        .bind(post.channel_ref.chat_id)
        .bind(post.channel_ref.message_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::DuplicateChannelRef(post.channel_ref))
        })?;

        sqlx::query(
            r"
            INSERT INTO user_stats (user_hash, post_count)
            VALUES ($1, 1)
            ON CONFLICT (user_hash) DO UPDATE SET post_count = user_stats.post_count + 1
            ",
        )
        .bind(post.author.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(post_id, "Post created");
        Ok(PostId::new(post_id))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE post_id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn find_by_channel_ref(&self, channel_ref: ChannelRef) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE chat_id = $1 AND message_id = $2"
        ))
        .bind(channel_ref.chat_id)
        .bind(channel_ref.message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, channel_ref: ChannelRef) -> RepoResult<SoftDeleteOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock makes concurrent deletes of the same post see each other
        let row = sqlx::query_as::<_, (i64, String, bool)>(
            r"
            SELECT post_id, user_hash, is_deleted
            FROM posts
            WHERE chat_id = $1 AND message_id = $2
            FOR UPDATE
            ",
        )
        .bind(channel_ref.chat_id)
        .bind(channel_ref.message_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some((post_id, user_hash, is_deleted)) = row else {
            warn!("Soft delete of unknown channel message");
            return Ok(SoftDeleteOutcome::NotFound);
        };

        let post_id_typed = PostId::new(post_id);
        if is_deleted {
            warn!(post_id, "Post already deleted");
            return Ok(SoftDeleteOutcome::AlreadyDeleted {
                post_id: post_id_typed,
            });
        }

        sqlx::query("UPDATE posts SET is_deleted = TRUE WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query(
            r"
            UPDATE user_stats
            SET post_count = GREATEST(post_count - 1, 0)
            WHERE user_hash = $1
            ",
        )
        .bind(&user_hash)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(post_id, "Post soft-deleted");
        Ok(SoftDeleteOutcome::Deleted {
            post_id: post_id_typed,
        })
    }

    #[instrument(skip(self))]
    async fn top_of_day(&self, day: NaiveDate) -> RepoResult<Option<TopPost>> {
        let (start, end) = day_bounds(day);

        let result = sqlx::query_as::<_, TopPostModel>(
            r"
            SELECT post_id, text, (skull + fire + clown) AS votes, chat_id, message_id
            FROM posts
            WHERE NOT is_deleted AND created_at >= $1 AND created_at < $2
            ORDER BY votes DESC, post_id ASC
            LIMIT 1
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(TopPost::from))
    }

    #[instrument(skip(self))]
    async fn daily_counts(&self, from: NaiveDate, to: NaiveDate) -> RepoResult<Vec<(NaiveDate, i64)>> {
        if from > to {
            return Ok(Vec::new());
        }
        let (start, _) = day_bounds(from);
        let (_, end) = day_bounds(to);

        let results = sqlx::query_as::<_, DailyCountModel>(
            r"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count
            FROM posts
            WHERE NOT is_deleted AND created_at >= $1 AND created_at < $2
            GROUP BY day
            ORDER BY day
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(|r| (r.day, r.count)).collect())
    }
}
