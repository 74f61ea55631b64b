//! # scream-db
//!
//! Storage layer implementing the repository traits from `scream-core`.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Schema bootstrap (`CREATE TABLE IF NOT EXISTS`)
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - PostgreSQL repository implementations
//! - [`memory::InMemoryStore`], a process-local implementation of the same traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scream_db::{create_pool, init_schema, PoolConfig, PgReactionRepository};
//! use scream_core::{ReactionRepository, ReactionKind};
//!
//! async fn example(config: &scream_common::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::from(&config.database)).await?;
//!     init_schema(&pool).await?;
//!     let reactions = PgReactionRepository::new(pool);
//!     // reactions.toggle(post_id, &user, ReactionKind::Fire).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use memory::InMemoryStore;
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{PgPostRepository, PgReactionRepository, PgUserStatsRepository};
pub use schema::{init_schema, ping};
