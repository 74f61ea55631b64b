//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use scream_core::{
    CounterDelta, PostId, PseudonymousUser, ReactionCounts, ReactionEntry, ReactionKind, ReactionRepository,
    ReactionTransition, RepoResult,
};

use crate::mappers::kind_from_column;
use crate::models::{CountersModel, ReactionModel};

use super::error::{map_db_error, post_not_found};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn toggle(
        &self,
        post_id: PostId,
        user: &PseudonymousUser,
        kind: ReactionKind,
    ) -> RepoResult<ReactionCounts> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Every toggle on this post queues behind the row lock, so the
        // ledger read below always sees the latest committed state.
        let locked = sqlx::query_scalar::<_, i64>(
            "SELECT post_id FROM posts WHERE post_id = $1 FOR UPDATE",
        )
        .bind(post_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;
        if locked.is_none() {
            return Err(post_not_found(post_id));
        }

        let current = sqlx::query_scalar::<_, String>(
            "SELECT kind FROM reactions WHERE post_id = $1 AND user_hash = $2",
        )
        .bind(post_id.into_inner())
        .bind(user.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .as_deref()
        .map(kind_from_column)
        .transpose()?;

        let transition = ReactionTransition::resolve(current, kind);

        match transition {
            ReactionTransition::Add(kind) => {
                sqlx::query("INSERT INTO reactions (post_id, user_hash, kind) VALUES ($1, $2, $3)")
                    .bind(post_id.into_inner())
                    .bind(user.as_str())
                    .bind(kind.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
            ReactionTransition::Remove(_) => {
                sqlx::query("DELETE FROM reactions WHERE post_id = $1 AND user_hash = $2")
                    .bind(post_id.into_inner())
                    .bind(user.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
            ReactionTransition::Switch { to, .. } => {
                sqlx::query("UPDATE reactions SET kind = $3 WHERE post_id = $1 AND user_hash = $2")
                    .bind(post_id.into_inner())
                    .bind(user.as_str())
                    .bind(to.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
        }

        let delta = transition.delta();
        let counters = sqlx::query_as::<_, CountersModel>(
            r"
            UPDATE posts
            SET skull = skull + $2, fire = fire + $3, clown = clown + $4
            WHERE post_id = $1
            RETURNING skull, fire, clown
            ",
        )
        .bind(post_id.into_inner())
        .bind(delta.skull)
        .bind(delta.fire)
        .bind(delta.clown)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        debug!(?transition, "Reaction toggled");
        Ok(counters.into())
    }

    #[instrument(skip(self))]
    async fn find(&self, post_id: PostId, user: &PseudonymousUser) -> RepoResult<Option<ReactionKind>> {
        sqlx::query_scalar::<_, String>(
            "SELECT kind FROM reactions WHERE post_id = $1 AND user_hash = $2",
        )
        .bind(post_id.into_inner())
        .bind(user.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .as_deref()
        .map(kind_from_column)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_post(&self, post_id: PostId) -> RepoResult<Vec<ReactionEntry>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT post_id, user_hash, kind
            FROM reactions
            WHERE post_id = $1
            ORDER BY user_hash
            ",
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(ReactionEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count_from_ledger(&self, post_id: PostId) -> RepoResult<ReactionCounts> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r"
            SELECT kind, COUNT(*) AS count
            FROM reactions
            WHERE post_id = $1
            GROUP BY kind
            ",
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().try_fold(
            ReactionCounts::default(),
            |counts, (kind, count)| -> RepoResult<ReactionCounts> {
                let kind = kind_from_column(&kind)?;
                Ok(counts.apply(CounterDelta::default().with(kind, count)))
            },
        )
    }
}
