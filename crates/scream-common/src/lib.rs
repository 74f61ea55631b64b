//! # scream-common
//!
//! Shared utilities including configuration, error handling, identity
//! pseudonymization, and telemetry.

pub mod config;
pub mod error;
pub mod identity;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ChannelConfig, ConfigError, CorsConfig, DatabaseConfig, DigestConfig,
    Environment, ImgflipConfig, PostConfig, SecurityConfig, ServerConfig, StoreBackend,
};
pub use error::{AppError, AppResult};
pub use identity::IdentityHasher;
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
