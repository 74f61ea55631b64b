//! Database models - SQLx-compatible structs for PostgreSQL tables

mod post;
mod reaction;
mod user_stats;

pub use post::{CountersModel, DailyCountModel, PostModel, TopPostModel};
pub use reaction::ReactionModel;
pub use user_stats::UserStatsModel;
