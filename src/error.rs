use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::{error, warn};

use crate::types::ValidationError;

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use 'YYYY-MM-DD'.";
pub const NOT_FOUND_MESSAGE: &str = "No users found matching the provided filters.";
pub const DATABASE_ERROR_MESSAGE: &str = "Database error occurred";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";
pub const MALFORMED_REQUEST_MESSAGE: &str = "Request could not be parsed.";
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Resource not found.";

#[derive(Debug, ThisError)]
pub enum UserError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("no users found matching the provided filters")]
    RecordsNotFound,

    #[error("Database error: {0}")]
    StorageFailure(#[from] SqlxError),

    #[error("malformed request ({status}): {reason}")]
    MalformedRequest { status: StatusCode, reason: String },

    #[error("no route for {method}")]
    RouteNotFound { method: String },

    #[error("unclassified error: {0}")]
    Unclassified(String),
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            UserError::RecordsNotFound | UserError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            UserError::MalformedRequest { status, .. } => *status,
            UserError::StorageFailure(_) | UserError::Unclassified(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show a client. Never includes storage or panic detail.
    pub fn client_message(&self) -> String {
        match self {
            UserError::InvalidInput(ValidationError::DateFormat { .. }) => {
                INVALID_DATE_MESSAGE.to_string()
            }
            UserError::InvalidInput(ValidationError::EmptyField { field }) => {
                format!("{field} must not be empty.")
            }
            UserError::RecordsNotFound => NOT_FOUND_MESSAGE.to_string(),
            UserError::StorageFailure(_) => DATABASE_ERROR_MESSAGE.to_string(),
            UserError::MalformedRequest { .. } => MALFORMED_REQUEST_MESSAGE.to_string(),
            UserError::RouteNotFound { .. } => ROUTE_NOT_FOUND_MESSAGE.to_string(),
            UserError::Unclassified(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

/// A failure bound to the request path it happened on.
#[derive(Debug, ThisError)]
#[error("{error} (path: {path})")]
pub struct ApiError {
    pub error: UserError,
    pub path: String,
}

impl ApiError {
    pub fn new(error: impl Into<UserError>, path: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            path: path.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.error.status();
        if status.is_server_error() {
            error!(path = %self.path, status = status.as_u16(), error = %self.error, "request failed");
        } else {
            warn!(path = %self.path, status = status.as_u16(), error = %self.error, "request rejected");
        }

        let body = ErrorEnvelope::new(self.error.client_message(), self.path);
        (status, Json(body)).into_response()
    }
}

/// Uniform error body: `{message, status: "error", path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
    pub status: String,
    pub path: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: "error".to_string(),
            path: path.into(),
        }
    }
}
