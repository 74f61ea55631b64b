//! Digest handlers
//!
//! Read-side aggregates and the admin meme endpoint.

use axum::{extract::State, Json};
use chrono::Utc;
use scream_core::WeekWindow;
use scream_service::dto::{
    DailyTopQuery, DailyTopResponse, PostMemeRequest, PublishedResponse, WeeklyCountsResponse,
    WeeklyQuery,
};
use scream_service::{DigestService, ScreamService};

use crate::extractors::{QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Top post of a day (UTC), today by default
///
/// GET /digest/daily?date=YYYY-MM-DD
pub async fn get_daily_top(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DailyTopQuery>,
) -> ApiResult<Json<DailyTopResponse>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let service = ScreamService::new(state.service_context());
    let top = service.top_post_of_day(date).await?;

    Ok(Json(DailyTopResponse {
        date,
        top: top.map(Into::into),
    }))
}

/// Seven per-day counts starting at `start`, this week's Monday by default
///
/// GET /digest/weekly?start=YYYY-MM-DD
pub async fn get_weekly_counts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<WeeklyQuery>,
) -> ApiResult<Json<WeeklyCountsResponse>> {
    let week = query.start.map_or_else(
        || WeekWindow::containing(Utc::now().date_naive()),
        WeekWindow::starting,
    );
    let service = ScreamService::new(state.service_context());
    let counts = service.weekly_counts(week.start()).await?;

    Ok(Json(WeeklyCountsResponse::new(week, counts)))
}

/// Render a meme and post it to the channel (admin only)
///
/// POST /digest/meme
pub async fn post_meme(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PostMemeRequest>,
) -> ApiResult<Created<PublishedResponse>> {
    let service = DigestService::new(state.service_context());
    let channel_ref = service.post_meme(req.admin_id, &req.text).await?;
    Ok(Created(channel_ref.into()))
}
