//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ChannelRef, PostId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Channel message {0} already carries a post")]
    DuplicateChannelRef(ChannelRef),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid reaction kind: {0}")]
    InvalidReactionKind(String),

    #[error("Post text must not be empty")]
    EmptyText,

    #[error("Post text too long: max {max} characters")]
    TextTooLong { max: usize },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PostNotFound(_) => "UNKNOWN_POST",

            // Conflict
            Self::DuplicateChannelRef(_) => "DUPLICATE_CHANNEL_REF",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidReactionKind(_) => "INVALID_REACTION_KIND",
            Self::EmptyText => "EMPTY_TEXT",
            Self::TextTooLong { .. } => "TEXT_TOO_LONG",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_))
    }

    /// Check if this clashes with an existing record
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateChannelRef(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidReactionKind(_)
                | Self::EmptyText
                | Self::TextTooLong { .. }
        )
    }

    /// HTTP status for this error: 404, 409, 400, or 500 for infrastructure faults
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_conflict() {
            409
        } else if self.is_validation() {
            400
        } else {
            500
        }
    }
}
