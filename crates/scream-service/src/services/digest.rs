//! Digest service
//!
//! Daily top scream and weekly stress report, posted to the channel with
//! a rendered image when one is available and as plain text otherwise.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use scream_core::{weekly_labels, ChannelRef, WeekWindow};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::scream::ScreamService;

/// Digest service
pub struct DigestService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DigestService<'a> {
    /// Create a new DigestService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post the top scream of `day`. Returns `None` when the day had no live posts.
    #[instrument(skip(self))]
    pub async fn post_daily_top(&self, day: NaiveDate) -> ServiceResult<Option<ChannelRef>> {
        let Some(top) = ScreamService::new(self.ctx).top_post_of_day(day).await? else {
            info!(%day, "No posts, skipping daily top");
            return Ok(None);
        };

        let caption = daily_caption(day, top.votes);
        let channel_ref = match self.ctx.renderer().render_meme(&top.text).await {
            Some(url) => self.ctx.channel().send_photo(&url, &caption).await?,
            None => {
                self.ctx
                    .channel()
                    .send_text(&format!("{caption}\n\n{}", top.text))
                    .await?
            }
        };

        info!(%day, post_id = %top.post_id, %channel_ref, "Daily top posted");
        Ok(Some(channel_ref))
    }

    /// Post the stress report for a seven-day window
    #[instrument(skip(self))]
    pub async fn post_weekly_report(&self, week: WeekWindow) -> ServiceResult<ChannelRef> {
        let counts = ScreamService::new(self.ctx).weekly_counts(week.start()).await?;
        let labels = weekly_labels(week.start());
        let caption = weekly_caption(week, &labels, &counts);

        let channel_ref = match self.ctx.renderer().render_chart(&labels, &counts).await {
            Some(url) => self.ctx.channel().send_photo(&url, &caption).await?,
            None => {
                warn!(start = %week.start(), "Chart unavailable, posting report as text");
                self.ctx.channel().send_text(&caption).await?
            }
        };

        info!(start = %week.start(), %channel_ref, "Weekly report posted");
        Ok(channel_ref)
    }

    /// Admin-only: render a meme from `text` and post it with `text` as caption
    #[instrument(skip(self, admin_id, text))]
    pub async fn post_meme(&self, admin_id: i64, text: &str) -> ServiceResult<ChannelRef> {
        ScreamService::new(self.ctx).require_admin(admin_id, "post memes")?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::validation("meme text must not be empty"));
        }

        let url = self
            .ctx
            .renderer()
            .render_meme(text)
            .await
            .ok_or_else(|| ServiceError::external("meme rendering failed"))?;

        let channel_ref = self.ctx.channel().send_photo(&url, text).await?;
        info!(%channel_ref, "Meme posted");
        Ok(channel_ref)
    }
}

/// `🏆 Top scream for 06 May with 3 votes`
pub fn daily_caption(day: NaiveDate, votes: i64) -> String {
    format!("🏆 Top scream for {} with {votes} votes", day.format("%d %b"))
}

/// Multi-line stress report: per-day counts, total, and daily average
pub fn weekly_caption(week: WeekWindow, labels: &[String], counts: &[i64; 7]) -> String {
    let total: i64 = counts.iter().sum();
    let average = total as f64 / 7.0;

    let mut lines = vec![
        format!(
            "📊 Weekly Stress Report ({} - {}) 📊",
            week.start().format("%d %b"),
            week.end().format("%d %b %Y")
        ),
        String::new(),
        "Screams per day:".to_string(),
    ];
    lines.extend(
        labels
            .iter()
            .zip(counts)
            .map(|(label, count)| format!("  {label}: {count}")),
    );
    lines.push(String::new());
    lines.push(format!("Total this week: {total}"));
    lines.push(format!("Weekly Average: {average:.1} screams/day"));
    lines.join("\n")
}
