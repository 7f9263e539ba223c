//! Error types for the GEOROC API
//!
//! Provides:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Input errors (1xxx)
    MissingParameter,
    UnparseableParameter,
    UnknownFormat,
    InvalidFilter,

    // Authentication errors (2xxx)
    Unauthorized,
    InvalidAccessKey,

    // Resource errors (4xxx)
    NotFound,

    // Dependency errors (7xxx)
    DatabaseError,
    ConnectionError,
    DecodeError,
    SecretError,

    // Internal errors (9xxx)
    FormatError,
    ConfigurationError,
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Input (1xxx)
            ErrorCode::MissingParameter => 1001,
            ErrorCode::UnparseableParameter => 1002,
            ErrorCode::UnknownFormat => 1003,
            ErrorCode::InvalidFilter => 1004,

            // Auth (2xxx)
            ErrorCode::Unauthorized => 2001,
            ErrorCode::InvalidAccessKey => 2002,

            // Resources (4xxx)
            ErrorCode::NotFound => 4001,

            // Dependencies (7xxx)
            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,
            ErrorCode::DecodeError => 7003,
            ErrorCode::SecretError => 7004,

            // Internal (9xxx)
            ErrorCode::FormatError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::InternalError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Required parameter missing: {name}")]
    MissingParameter { name: String },

    #[error("Cannot parse parameter {name}: {value:?}")]
    UnparseableParameter { name: String, value: String },

    #[error("Unknown download format: {format}")]
    UnknownFormat { format: String },

    #[error("Invalid filter: {message}")]
    InvalidFilter { message: String },

    // Authentication errors
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid access key")]
    InvalidAccessKey,

    // Resource errors
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    // Dependency errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    #[error("Row decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Secret source error: {message}")]
    Secret { message: String },

    // Internal errors
    #[error("Export formatting error: {message}")]
    Format { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MissingParameter { .. } => ErrorCode::MissingParameter,
            AppError::UnparseableParameter { .. } => ErrorCode::UnparseableParameter,
            AppError::UnknownFormat { .. } => ErrorCode::UnknownFormat,
            AppError::InvalidFilter { .. } => ErrorCode::InvalidFilter,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::InvalidAccessKey => ErrorCode::InvalidAccessKey,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Decode(_) => ErrorCode::DecodeError,
            AppError::Secret { .. } => ErrorCode::SecretError,
            AppError::Format { .. } => ErrorCode::FormatError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::MissingParameter { .. }
            | AppError::UnknownFormat { .. }
            | AppError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::Unauthorized { .. } | AppError::InvalidAccessKey => {
                StatusCode::UNAUTHORIZED
            }

            // 404 Not Found
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,

            // 422 Unprocessable Entity
            AppError::UnparseableParameter { .. } => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::Decode(_)
            | AppError::Secret { .. }
            | AppError::Format { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. }
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity; dependency errors keep the specific
        // cause in the log while the body stays generic
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let public_message = if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            message
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message: public_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::NotFound {
            resource_type: "citation".into(),
            id: "42".into(),
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_pagination_error_is_422() {
        let err = AppError::UnparseableParameter {
            name: "limit".into(),
            value: "ten".into(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_missing_param_is_400() {
        let err = AppError::MissingParameter {
            name: "sampleids".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_error() {
        let err = AppError::Secret {
            message: "file unreadable".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }
}
