//! Application error types
//!
//! Failures while assembling or running the process: configuration,
//! storage bootstrap, listener setup. Request-level failures are mapped
//! to HTTP responses in the API crate instead.

use scream_core::DomainError;

/// Startup and infrastructure error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    // Bind and serve failures
    #[error("Server error: {0}")]
    Server(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Wrap any error as internal
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
