//! Scream API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p scream-api
//! ```
//!
//! Configuration is loaded from environment variables and `.env`.

use scream_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Configuration picks the log format, so load it before tracing
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let tracing_config =
        TracingConfig::for_environment(config.app.env, config.app.log_format.as_deref());
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        backend = ?config.database.backend,
        port = config.api.port,
        "Configuration loaded"
    );

    if let Err(e) = scream_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
