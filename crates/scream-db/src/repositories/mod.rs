//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in scream-core.
//! Every mutating method runs inside a single transaction.

mod error;
mod post;
mod reaction;
mod user_stats;

pub use post::PgPostRepository;
pub use reaction::PgReactionRepository;
pub use user_stats::PgUserStatsRepository;
