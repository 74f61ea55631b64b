//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use scream_common::{AppConfig, AppError, Environment, StoreBackend};
use scream_db::{create_pool, init_schema, InMemoryStore, PoolConfig};
use scream_service::{
    ChannelPublisher, DigestScheduler, HttpRenderer, LogChannel, ServiceContext,
    TelegramChannel,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let is_production = state.config().app.env == Environment::Production;
    let router = apply_middleware(create_router(), &state.config().cors, is_production);
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let builder = ServiceContext::builder().config(&config);

    let builder = match config.database.backend {
        StoreBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PoolConfig::from(&config.database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            init_schema(&pool)
                .await
                .map_err(|e| AppError::Database(format!("schema bootstrap failed: {e}")))?;
            info!("PostgreSQL connection established");
            builder.pool(pool)
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            builder.store(InMemoryStore::new())
        }
    };

    let channel: Arc<dyn ChannelPublisher> = match &config.channel.bot_token {
        Some(token) => Arc::new(TelegramChannel::new(token.clone(), config.channel.channel_id)?),
        None => {
            warn!("BOT_TOKEN not set; channel messages are only logged");
            Arc::new(LogChannel::new(config.channel.channel_id))
        }
    };

    let renderer = HttpRenderer::from_config(&config.imgflip)?;

    let service_context = builder
        .channel(channel)
        .renderer(Arc::new(renderer))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = format!("{}:{}", config.api.host, config.api.port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API_HOST/API_PORT: {e}")))?;
    let digest_enabled = config.digest.enabled;

    let state = create_app_state(config).await?;

    let scheduler = if digest_enabled {
        Some(DigestScheduler::new(state.service_context().clone()).spawn())
    } else {
        info!("Digest scheduler disabled");
        None
    };

    let app = create_app(state);
    let result = run_server(app, addr).await;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    result
}
