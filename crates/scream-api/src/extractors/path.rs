//! Path parameter extractors
//!
//! Type-safe extraction of numeric ids from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use scream_core::{ChannelRef, PostId};
use serde::de::DeserializeOwned;

use crate::response::ApiError;

/// Extract path parameters, rejecting with `INVALID_PATH_PARAMETER`
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(PathParams(inner))
    }
}

/// Path parameters with post_id
#[derive(Debug, serde::Deserialize)]
pub struct PostIdPath {
    pub post_id: i64,
}

impl PostIdPath {
    pub fn post_id(&self) -> PostId {
        PostId::new(self.post_id)
    }
}

/// Path parameters naming one channel message
#[derive(Debug, serde::Deserialize)]
pub struct ChannelMessagePath {
    pub chat_id: i64,
    pub message_id: i64,
}

impl ChannelMessagePath {
    pub fn channel_ref(&self) -> ChannelRef {
        ChannelRef::new(self.chat_id, self.message_id)
    }
}

/// Path parameters with a real user id
#[derive(Debug, serde::Deserialize)]
pub struct UserIdPath {
    pub user_id: i64,
}
