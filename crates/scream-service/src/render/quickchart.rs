//! QuickChart line chart generator

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, instrument};

const QUICKCHART_API_URL: &str = "https://quickchart.io/chart/create";

/// Request body for a white-background line chart of screams per day
pub fn chart_payload(labels: &[String], data: &[i64]) -> Value {
    json!({
        "backgroundColor": "white",
        "width": 500,
        "height": 300,
        "format": "png",
        "chart": {
            "type": "line",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "Screams",
                    "data": data,
                    "fill": false,
                    "tension": 0.1,
                }],
            },
            "options": { "responsive": true },
        },
    })
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    success: bool,
    url: Option<String>,
}

/// Client for QuickChart's short-URL endpoint
#[derive(Debug, Clone)]
pub struct QuickChartRenderer {
    client: reqwest::Client,
}

impl QuickChartRenderer {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn render(&self, labels: &[String], data: &[i64]) -> Option<String> {
        let response = match self
            .client
            .post(QUICKCHART_API_URL)
            .json(&chart_payload(labels, data))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "QuickChart request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            error!(status = %response.status(), "QuickChart returned an error status");
            return None;
        }

        match response.json::<CreateResponse>().await {
            Ok(CreateResponse {
                success: true,
                url: Some(url),
            }) => {
                info!(%url, "Chart rendered");
                Some(url)
            }
            Ok(_) => {
                error!("QuickChart reported failure");
                None
            }
            Err(e) => {
                error!(error = %e, "QuickChart response was not valid JSON");
                None
            }
        }
    }
}
