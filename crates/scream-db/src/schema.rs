//! Schema bootstrap
//!
//! Tables are created idempotently at startup. Counter columns on `posts`
//! are a denormalized cache of the `reactions` ledger; they are only ever
//! written by the toggle transaction.

use sqlx::PgPool;
use tracing::info;

/// Full schema, safe to run repeatedly
pub const SCHEMA_DDL: &str = r"
CREATE TABLE IF NOT EXISTS posts (
    post_id     BIGSERIAL PRIMARY KEY,
    user_hash   TEXT        NOT NULL,
    text        TEXT        NOT NULL,
    skull       BIGINT      NOT NULL DEFAULT 0,
    fire        BIGINT      NOT NULL DEFAULT 0,
    clown       BIGINT      NOT NULL DEFAULT 0,
    chat_id     BIGINT      NOT NULL,
    message_id  BIGINT      NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted  BOOLEAN     NOT NULL DEFAULT FALSE,
    CONSTRAINT posts_channel_ref_key UNIQUE (chat_id, message_id)
);

CREATE INDEX IF NOT EXISTS posts_created_at_idx ON posts (created_at) WHERE NOT is_deleted;

CREATE TABLE IF NOT EXISTS reactions (
    post_id     BIGINT NOT NULL REFERENCES posts (post_id),
    user_hash   TEXT   NOT NULL,
    kind        TEXT   NOT NULL CHECK (kind IN ('skull', 'fire', 'clown')),
    PRIMARY KEY (post_id, user_hash)
);

CREATE TABLE IF NOT EXISTS user_stats (
    user_hash   TEXT   PRIMARY KEY,
    post_count  BIGINT NOT NULL DEFAULT 0
);
";

/// Create tables and indexes if they do not exist
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_DDL).execute(pool).await?;
    info!("Database schema ready");
    Ok(())
}

/// Round-trip a trivial query (readiness check)
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
