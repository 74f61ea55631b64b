//! Domain entities - core business objects

mod post;
mod reaction;
mod user_stats;

pub use post::{NewPost, Post, SoftDeleteOutcome, TopPost};
pub use reaction::ReactionEntry;
pub use user_stats::UserAggregate;
