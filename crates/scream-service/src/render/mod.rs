//! Image rendering capability
//!
//! Digests turn text into a meme picture and weekly counts into a chart
//! through an [`ImageRenderer`]. Renderers never fail loudly: every problem
//! is logged and reported as `None`, and callers fall back to plain text.

mod imgflip;
mod quickchart;

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

pub use imgflip::{split_caption, ImgflipRenderer, MEME_TEMPLATE_IDS};
pub use quickchart::{chart_payload, QuickChartRenderer};

use crate::services::{ServiceError, ServiceResult};

/// Timeout for a single rendering call
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Produces public image URLs
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    /// Meme picture captioned with `text`
    async fn render_meme(&self, text: &str) -> Option<String>;

    /// Line chart of `data` over `labels`
    async fn render_chart(&self, labels: &[String], data: &[i64]) -> Option<String>;
}

/// Imgflip for memes, QuickChart for charts
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    meme: Option<ImgflipRenderer>,
    chart: QuickChartRenderer,
}

impl HttpRenderer {
    pub fn new(meme: Option<ImgflipRenderer>, chart: QuickChartRenderer) -> Self {
        Self { meme, chart }
    }

    /// Build both clients; memes are disabled without Imgflip credentials
    pub fn from_config(imgflip: &scream_common::ImgflipConfig) -> ServiceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(RENDER_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::internal(format!("http client: {e}")))?;

        let meme = imgflip
            .credentials()
            .map(|(user, pass)| ImgflipRenderer::new(client.clone(), user, pass));
        if meme.is_none() {
            warn!("Imgflip credentials missing, memes disabled");
        }

        Ok(Self::new(meme, QuickChartRenderer::new(client)))
    }
}

#[async_trait]
impl ImageRenderer for HttpRenderer {
    async fn render_meme(&self, text: &str) -> Option<String> {
        match &self.meme {
            Some(imgflip) => imgflip.render(text).await,
            None => {
                warn!("Meme requested but Imgflip is not configured");
                None
            }
        }
    }

    async fn render_chart(&self, labels: &[String], data: &[i64]) -> Option<String> {
        self.chart.render(labels, data).await
    }
}

/// Renders nothing; digests fall back to text
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRenderer;

#[async_trait]
impl ImageRenderer for DisabledRenderer {
    async fn render_meme(&self, _text: &str) -> Option<String> {
        None
    }

    async fn render_chart(&self, _labels: &[String], _data: &[i64]) -> Option<String> {
        None
    }
}
