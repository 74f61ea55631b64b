//! Post ID - monotonically increasing identifier assigned by the store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal post identifier.
///
/// Assigned by the store at creation time, strictly increasing across
/// sequential creations and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Create a PostId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, PostIdParseError> {
        s.trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(PostId)
            .ok_or(PostIdParseError::InvalidFormat)
    }
}

/// Error when parsing a PostId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PostIdParseError {
    #[error("invalid post id format")]
    InvalidFormat,
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<PostId> for i64 {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl std::str::FromStr for PostId {
    type Err = PostIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostId::parse(s)
    }
}
