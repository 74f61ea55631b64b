//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.
//! Servers run on the in-memory store with a [`LogChannel`] the test can
//! inspect; set `DATABASE_URL` to also exercise the PostgreSQL backend.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use scream_api::{create_app, create_app_state, AppState};
use scream_common::AppConfig;
use scream_db::InMemoryStore;
use scream_service::{
    DisabledRenderer, ImageRenderer, LogChannel, Published, ServiceContext,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Admin id configured on every test server
pub const TEST_ADMIN: i64 = 1;

/// Channel id configured on every test server
pub const TEST_CHANNEL: i64 = -1001;

/// Renderer that always succeeds with fixed URLs
pub struct StubRenderer;

#[async_trait]
impl ImageRenderer for StubRenderer {
    async fn render_meme(&self, _text: &str) -> Option<String> {
        Some("https://i.imgflip.com/stub.jpg".to_string())
    }

    async fn render_chart(&self, _labels: &[String], _data: &[i64]) -> Option<String> {
        Some("https://quickchart.io/chart/render/stub".to_string())
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Backing store, present on the in-memory backend
    pub store: Option<InMemoryStore>,
    /// Channel double, present on the in-memory backend
    pub channel: Option<LogChannel>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the in-memory store with renderers disabled
    pub async fn start() -> Result<Self> {
        Self::start_with_renderer(Arc::new(DisabledRenderer)).await
    }

    /// Start a server on the in-memory store with the given renderer
    pub async fn start_with_renderer(renderer: Arc<dyn ImageRenderer>) -> Result<Self> {
        let config = test_config(&[])?;
        let store = InMemoryStore::new();
        let channel = LogChannel::new(TEST_CHANNEL);

        let ctx = ServiceContext::builder()
            .config(&config)
            .store(store.clone())
            .channel(Arc::new(channel.clone()))
            .renderer(renderer)
            .build()?;

        let mut server = Self::serve(AppState::new(ctx, config)).await?;
        server.store = Some(store);
        server.channel = Some(channel);
        Ok(server)
    }

    /// Start a server through the production bootstrap against PostgreSQL
    pub async fn start_postgres(database_url: &str) -> Result<Self> {
        let config = test_config(&[("STORE_BACKEND", "postgres"), ("DATABASE_URL", database_url)])?;
        let state = create_app_state(config).await?;
        Self::serve(state).await
    }

    async fn serve(state: AppState) -> Result<Self> {
        let app = create_app(state);

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store: None,
            channel: None,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a DELETE request with JSON body
    pub async fn delete<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).json(body).send().await?)
    }

    /// Everything the server published to the channel so far
    pub async fn published(&self) -> Vec<Published> {
        match &self.channel {
            Some(channel) => channel.published().await,
            None => Vec::new(),
        }
    }
}

/// Test configuration on the memory backend, with `overrides` applied
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("STORE_BACKEND", "memory".to_string()),
        ("CHANNEL_ID", TEST_CHANNEL.to_string()),
        ("ADMINS", TEST_ADMIN.to_string()),
        ("HASH_SALT", "integration-salt".to_string()),
        ("DIGEST_ENABLED", "false".to_string()),
        ("MAX_POST_LENGTH", "280".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// `DATABASE_URL` if a PostgreSQL instance is available for tests
pub fn postgres_url() -> Option<String> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok();
    if url.is_none() {
        eprintln!("Skipping test: DATABASE_URL not set");
    }
    url
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: crate::fixtures::ErrorBody = assert_json(response, expected_status).await?;
    Ok(body.error.code)
}
