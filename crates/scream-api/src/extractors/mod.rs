//! Axum extractors for request handling
//!
//! Wrappers around axum's extractors that reject with [`ApiError`]
//! JSON bodies instead of plain-text responses.
//!
//! [`ApiError`]: crate::response::ApiError

mod path;
mod query;
mod validated;

pub use path::{ChannelMessagePath, PathParams, PostIdPath, UserIdPath};
pub use query::QueryParams;
pub use validated::ValidatedJson;
