//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{channels, digest, health, reactions, screams, users};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(scream_routes())
        .merge(channel_routes())
        .merge(user_routes())
        .merge(digest_routes())
}

/// Scream and reaction routes
fn scream_routes() -> Router<AppState> {
    Router::new()
        .route("/screams", post(screams::create_scream))
        .route("/screams/:post_id", get(screams::get_scream))
        .route("/screams/:post_id/reactions", post(reactions::toggle_reaction))
}

/// Channel message routes (moderation)
fn channel_routes() -> Router<AppState> {
    Router::new().route(
        "/channels/:chat_id/messages/:message_id",
        delete(channels::delete_channel_message),
    )
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/stats", get(users::get_user_stats))
}

/// Digest routes
fn digest_routes() -> Router<AppState> {
    Router::new()
        .route("/digest/daily", get(digest::get_daily_top))
        .route("/digest/weekly", get(digest::get_weekly_counts))
        .route("/digest/meme", post(digest::post_meme))
}
