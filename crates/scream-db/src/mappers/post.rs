//! Post model -> entity mappers

use scream_core::{
    ChannelRef, Post, PostId, PseudonymousUser, ReactionCounts, TopPost, UserAggregate,
};

use crate::models::{CountersModel, PostModel, TopPostModel, UserStatsModel};

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: PostId::new(model.post_id),
            author: PseudonymousUser::from_handle(model.user_hash),
            text: model.text,
            counts: ReactionCounts::new(model.skull, model.fire, model.clown),
            channel_ref: ChannelRef::new(model.chat_id, model.message_id),
            created_at: model.created_at,
            is_deleted: model.is_deleted,
        }
    }
}

impl From<CountersModel> for ReactionCounts {
    fn from(model: CountersModel) -> Self {
        ReactionCounts::new(model.skull, model.fire, model.clown)
    }
}

impl From<TopPostModel> for TopPost {
    fn from(model: TopPostModel) -> Self {
        TopPost {
            post_id: PostId::new(model.post_id),
            text: model.text,
            votes: model.votes,
            channel_ref: ChannelRef::new(model.chat_id, model.message_id),
        }
    }
}

impl From<UserStatsModel> for UserAggregate {
    fn from(model: UserStatsModel) -> Self {
        UserAggregate {
            user: PseudonymousUser::from_handle(model.user_hash),
            post_count: model.post_count,
        }
    }
}
