//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs, with `From` conversions
//!   from the domain types

pub mod requests;
pub mod responses;

pub use requests::{
    CreateScreamRequest, DailyTopQuery, DeletePostRequest, PostMemeRequest,
    ToggleReactionRequest, WeeklyQuery,
};

pub use responses::{
    CreatedScreamResponse, DailyTopResponse, HealthChecks, HealthResponse, PostResponse,
    PublishedResponse, ReactionCountsResponse, ReadinessResponse, TopPostResponse,
    UserStatsResponse, WeeklyCountsResponse,
};
