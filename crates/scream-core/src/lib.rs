//! # scream-core
//!
//! Domain layer for the anonymous scream board: posts, the reaction ledger,
//! per-user aggregates, the reaction state machine, and the repository traits
//! the storage layer implements. No dependencies on infrastructure.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{NewPost, Post, ReactionEntry, SoftDeleteOutcome, TopPost, UserAggregate};
pub use error::DomainError;
pub use traits::{PostRepository, ReactionRepository, RepoResult, UserStatsRepository};
pub use value_objects::{
    day_bounds, weekly_histogram, weekly_labels, ChannelRef, CounterDelta, PostId,
    PostIdParseError, PseudonymousUser, ReactionCounts, ReactionKind, ReactionTransition,
    WeekWindow,
};
