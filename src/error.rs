/// Unified error types for the roster admin backend
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the backend
#[derive(Error, Debug)]
pub enum RosterError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Unknown username or wrong password
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Correct credentials on a deactivated account
    #[error("Account banned: {0}")]
    Banned(String),

    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Permission group outside the five known levels
    #[error("Invalid permission group: {0}")]
    InvalidGroup(String),

    /// Uniqueness violation (username, email or game id)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password hashing failures
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RosterError {
    /// Map a UNIQUE / PRIMARY KEY violation to `Conflict`, pass everything else through
    pub fn from_insert(err: sqlx::Error, conflict_message: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RosterError::Conflict(conflict_message.into())
            }
            _ => RosterError::Database(err),
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert RosterError to HTTP response
impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            RosterError::Authentication(_) => (
                StatusCode::UNAUTHORIZED,
                "AuthenticationFailed",
                self.to_string(),
            ),
            RosterError::Banned(_) => (StatusCode::FORBIDDEN, "AccountBanned", self.to_string()),
            RosterError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string())
            }
            RosterError::InvalidGroup(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidPermissionGroup",
                self.to_string(),
            ),
            // Duplicates are reported as 400 on the wire
            RosterError::Conflict(_) => (StatusCode::BAD_REQUEST, "Conflict", self.to_string()),
            RosterError::Database(_)
            | RosterError::Migration(_)
            | RosterError::PasswordHash(_)
            | RosterError::Internal(_)
            | RosterError::Io(_) => {
                tracing::error!("request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    "Internal server error".to_string(), // Don't leak details
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for backend operations
pub type RosterResult<T> = Result<T, RosterError>;
