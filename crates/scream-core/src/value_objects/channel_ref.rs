//! Reference to where a post was published in the shared channel

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat + message identifier pair.
///
/// This is the canonical handle for locating a post for soft deletion: it is
/// the only identifier the front-end holds once the message is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef {
    pub chat_id: i64,
    pub message_id: i64,
}

impl ChannelRef {
    pub const fn new(chat_id: i64, message_id: i64) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat_id, self.message_id)
    }
}
