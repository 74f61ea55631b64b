//! Reaction handlers

use axum::{extract::State, Json};
use scream_service::dto::{ReactionCountsResponse, ToggleReactionRequest};
use scream_service::ScreamService;

use crate::extractors::{PathParams, PostIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Toggle a reaction: add, remove, or switch kind
///
/// POST /screams/{post_id}/reactions
pub async fn toggle_reaction(
    State(state): State<AppState>,
    PathParams(path): PathParams<PostIdPath>,
    ValidatedJson(req): ValidatedJson<ToggleReactionRequest>,
) -> ApiResult<Json<ReactionCountsResponse>> {
    let service = ScreamService::new(state.service_context());
    let counts = service
        .toggle_reaction(path.post_id(), req.user_id, &req.kind)
        .await?;
    Ok(Json(counts.into()))
}
