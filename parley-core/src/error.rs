//! Error types for Parley operations

use thiserror::Error;

/// Failures talking to the remote CRM.
///
/// The gateway maps every non-2xx response and transport failure into one
/// of these variants; nothing above the gateway sees raw HTTP errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CrmError {
    #[error("CRM rejected the credential")]
    Unauthenticated,

    #[error("{resource} not found in CRM")]
    NotFound { resource: String },

    #[error("CRM request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Transport failure talking to CRM: {message}")]
    Transport { message: String },

    #[error("Invalid response from CRM: {reason}")]
    InvalidResponse { reason: String },

    #[error("CRM accepted the {resource} write but returned no id")]
    MissingId { resource: &'static str },
}

/// Input validation failures. Raised before any network call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Configuration errors raised at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Parley errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParleyError {
    #[error(transparent)]
    Crm(#[from] CrmError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias used across the workspace.
pub type ParleyResult<T> = Result<T, ParleyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crm_error_display() {
        let err = CrmError::NotFound {
            resource: "case 99".to_string(),
        };
        assert_eq!(err.to_string(), "case 99 not found in CRM");

        let err = CrmError::RequestFailed {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::RequiredFieldMissing {
            field: "query".to_string(),
        };
        assert_eq!(err.to_string(), "Required field missing: query");
    }

    #[test]
    fn test_master_error_is_transparent() {
        let inner = CrmError::Unauthenticated;
        let outer: ParleyError = inner.clone().into();
        assert_eq!(outer.to_string(), inner.to_string());
    }
}
