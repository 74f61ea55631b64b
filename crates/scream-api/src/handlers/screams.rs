//! Scream handlers
//!
//! Endpoints for submitting and viewing posts.

use axum::{extract::State, Json};
use scream_service::dto::{CreateScreamRequest, CreatedScreamResponse, PostResponse};
use scream_service::ScreamService;

use crate::extractors::{PathParams, PostIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Submit a scream
///
/// POST /screams
pub async fn create_scream(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateScreamRequest>,
) -> ApiResult<Created<CreatedScreamResponse>> {
    let service = ScreamService::new(state.service_context());
    let post = service
        .submit(req.user_id, &req.text, req.channel_ref())
        .await?;
    Ok(Created(CreatedScreamResponse::new(
        post.id,
        post.text,
        post.channel_ref,
    )))
}

/// Get a post with its counters
///
/// GET /screams/{post_id}
pub async fn get_scream(
    State(state): State<AppState>,
    PathParams(path): PathParams<PostIdPath>,
) -> ApiResult<Json<PostResponse>> {
    let service = ScreamService::new(state.service_context());
    let post = service.get_post(path.post_id()).await?;
    Ok(Json(post.into()))
}
