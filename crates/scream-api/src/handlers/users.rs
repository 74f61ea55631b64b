//! User handlers

use axum::{extract::State, Json};
use chrono::Utc;
use scream_core::WeekWindow;
use scream_service::dto::{UserStatsResponse, WeeklyCountsResponse};
use scream_service::ScreamService;

use crate::extractors::{PathParams, UserIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Post count plus the current week's histogram and its chart
///
/// GET /users/{user_id}/stats
pub async fn get_user_stats(
    State(state): State<AppState>,
    PathParams(path): PathParams<UserIdPath>,
) -> ApiResult<Json<UserStatsResponse>> {
    let service = ScreamService::new(state.service_context());
    let post_count = service.user_post_count(path.user_id).await?;

    let week = WeekWindow::containing(Utc::now().date_naive());
    let counts = service.weekly_counts(week.start()).await?;
    let week = WeeklyCountsResponse::new(week, counts);

    let chart_url = state
        .service_context()
        .renderer()
        .render_chart(&week.labels, &week.counts)
        .await;

    Ok(Json(UserStatsResponse {
        post_count,
        week,
        chart_url,
    }))
}
