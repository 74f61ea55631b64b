//! Value objects - immutable types that represent domain concepts

mod calendar;
mod channel_ref;
mod post_id;
mod pseudonym;
mod reaction_kind;

pub use calendar::{day_bounds, weekly_histogram, weekly_labels, WeekWindow};
pub use channel_ref::ChannelRef;
pub use post_id::{PostId, PostIdParseError};
pub use pseudonym::PseudonymousUser;
pub use reaction_kind::{CounterDelta, ReactionCounts, ReactionKind, ReactionTransition};
