//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ChannelConfig, ConfigError, CorsConfig, DatabaseConfig, DigestConfig,
    Environment, ImgflipConfig, PostConfig, SecurityConfig, ServerConfig, StoreBackend,
};
