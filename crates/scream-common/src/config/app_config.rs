//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::collections::HashSet;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub channel: ChannelConfig,
    pub imgflip: ImgflipConfig,
    pub post: PostConfig,
    pub digest: DigestConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
    /// `json` or `pretty`; unset picks the environment preset
    #[serde(default)]
    pub log_format: Option<String>,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which store implementation backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Process-local store; state is lost on restart
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Identity pseudonymization and admin settings
#[derive(Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_hash_salt")]
    pub hash_salt: String,
    /// Real caller ids allowed to run moderation operations
    #[serde(default)]
    pub admins: HashSet<i64>,
}

impl SecurityConfig {
    #[must_use]
    pub fn is_admin(&self, actor_id: i64) -> bool {
        self.admins.contains(&actor_id)
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("hash_salt", &"<redacted>")
            .field("admins", &self.admins.len())
            .finish()
    }
}

/// Shared channel where screams and digests are published
#[derive(Clone, Deserialize)]
pub struct ChannelConfig {
    pub channel_id: i64,
    /// Bot API token; without it digests are only logged
    #[serde(default)]
    pub bot_token: Option<String>,
}

impl std::fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("channel_id", &self.channel_id)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Imgflip meme generator credentials
#[derive(Clone, Default, Deserialize)]
pub struct ImgflipConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ImgflipConfig {
    /// Both username and password are present
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ImgflipConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgflipConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Post submission limits
#[derive(Debug, Clone, Deserialize)]
pub struct PostConfig {
    #[serde(default = "default_max_post_length")]
    pub max_length: usize,
}

/// Periodic digest settings
#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    #[serde(default = "default_digest_enabled")]
    pub enabled: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "innoscream".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_hash_salt() -> String {
    "dev-salt".to_string()
}

fn default_max_post_length() -> usize {
    4096 // chat platform message limit
}

fn default_digest_enabled() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &'static str| -> Result<Option<i64>, ConfigError> {
            lookup(key)
                .map(|s| {
                    s.trim()
                        .parse::<i64>()
                        .map_err(|_| ConfigError::InvalidValue(key, s.clone()))
                })
                .transpose()
        };

        let backend = match lookup("STORE_BACKEND").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::InvalidValue("STORE_BACKEND", other.to_string())),
        };

        let url = match (backend, lookup("DATABASE_URL")) {
            (_, Some(url)) => url,
            (StoreBackend::Memory, None) => String::new(),
            (StoreBackend::Postgres, None) => return Err(ConfigError::MissingVar("DATABASE_URL")),
        };

        let admins = lookup("ADMINS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(|id| {
                        id.parse::<i64>()
                            .map_err(|_| ConfigError::InvalidValue("ADMINS", id.to_string()))
                    })
                    .collect::<Result<HashSet<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
                log_format: lookup("LOG_FORMAT"),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: lookup("API_PORT")
                    .map(|s| {
                        s.parse()
                            .map_err(|_| ConfigError::InvalidValue("API_PORT", s.clone()))
                    })
                    .transpose()?
                    .unwrap_or_else(default_port),
            },
            database: DatabaseConfig {
                backend,
                url,
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: lookup("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            security: SecurityConfig {
                hash_salt: lookup("HASH_SALT").unwrap_or_else(default_hash_salt),
                admins,
            },
            channel: ChannelConfig {
                channel_id: parsed("CHANNEL_ID")?.ok_or(ConfigError::MissingVar("CHANNEL_ID"))?,
                bot_token: lookup("BOT_TOKEN").filter(|t| !t.is_empty()),
            },
            imgflip: ImgflipConfig {
                username: lookup("IMGFLIP_USER"),
                password: lookup("IMGFLIP_PASS"),
            },
            post: PostConfig {
                max_length: lookup("MAX_POST_LENGTH")
                    .and_then(|s| s.parse().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or_else(default_max_post_length),
            },
            digest: DigestConfig {
                enabled: lookup("DIGEST_ENABLED")
                    .map(|s| !matches!(s.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                    .unwrap_or_else(default_digest_enabled),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
