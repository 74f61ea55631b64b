//! Channel message handlers
//!
//! Moderation deletes address posts by the channel message they were
//! published as.

use axum::{extract::State, Json};
use scream_core::SoftDeleteOutcome;
use scream_service::dto::DeletePostRequest;
use scream_service::ScreamService;

use crate::extractors::{ChannelMessagePath, PathParams, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Soft delete the post behind a channel message (admin only)
///
/// DELETE /channels/{chat_id}/messages/{message_id}
pub async fn delete_channel_message(
    State(state): State<AppState>,
    PathParams(path): PathParams<ChannelMessagePath>,
    ValidatedJson(req): ValidatedJson<DeletePostRequest>,
) -> ApiResult<Json<SoftDeleteOutcome>> {
    let service = ScreamService::new(state.service_context());
    let outcome = service
        .moderate_delete(req.admin_id, path.channel_ref())
        .await?;
    Ok(Json(outcome))
}
