//! Error Types for the Parley API
//!
//! This module defines error handling for the relay layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parley_core::{CrmError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code and represents
/// a category of error that can occur while relaying to the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Authentication Errors (401)
    // ========================================================================
    /// The CRM rejected our credential
    Unauthenticated,

    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request validation failed
    ValidationFailed,

    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// A CRM resource referenced by a known id does not exist
    RemoteNotFound,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// The CRM write or read failed
    RemoteFailure,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingField => StatusCode::BAD_REQUEST,

            ErrorCode::RemoteNotFound => StatusCode::NOT_FOUND,

            ErrorCode::RemoteFailure | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "CRM rejected the configured credential",
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::RemoteNotFound => "CRM resource not found",
            ErrorCode::RemoteFailure => "CRM operation failed",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
///
/// Returned by all endpoints when an error occurs; the terminal client
/// surfaces `message` directly to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create an Unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    /// Create a ValidationFailed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    /// Create a RemoteNotFound error.
    pub fn remote_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RemoteNotFound, message)
    }

    /// Create a RemoteNotFound error for a case id.
    pub fn case_not_found(case_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::RemoteNotFound,
            format!("Case {} not found", case_id),
        )
    }

    /// Create a RemoteFailure error.
    pub fn remote_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RemoteFailure, message)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Implement IntoResponse for ApiError to enable automatic error handling
/// in Axum handlers:
/// ```ignore
/// async fn handler() -> Result<Json<Response>, ApiError> {
///     Err(ApiError::invalid_input("query must not be empty"))
/// }
/// ```
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

/// Convert gateway failures to the API error envelope.
impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::Unauthenticated => {
                ApiError::unauthenticated("CRM rejected the configured credential")
            }
            CrmError::NotFound { resource } => {
                ApiError::remote_not_found(format!("{} not found", resource))
            }
            CrmError::RequestFailed { status, message } => {
                tracing::error!(status, %message, "CRM request failed");
                ApiError::remote_failure(format!("CRM returned {}: {}", status, message))
            }
            CrmError::Transport { message } => {
                tracing::error!(%message, "CRM transport failure");
                ApiError::remote_failure("Could not reach the CRM")
            }
            CrmError::InvalidResponse { reason } => {
                tracing::error!(%reason, "CRM returned an unparseable response");
                ApiError::remote_failure("CRM returned an unexpected response")
            }
            CrmError::MissingId { resource } => ApiError::remote_failure(format!(
                "CRM accepted the {} write but returned no id",
                resource
            )),
        }
    }
}

/// Convert validation failures to the API error envelope.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::RequiredFieldMissing { field } => ApiError::missing_field(&field),
            ValidationError::InvalidValue { field, reason } => {
                ApiError::invalid_input(format!("Invalid value for '{}': {}", field, reason))
            }
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
