//! Validation Traits
//!
//! Common validation patterns extracted from route handlers. Every handler
//! validates its input before touching the gateway, so an invalid request
//! never costs a network call.

use crate::error::{ApiError, ApiResult};

/// Trait for validating non-empty strings.
///
/// # Example
/// ```ignore
/// use parley_api::validation::ValidateNonEmpty;
///
/// fn create_project(name: &str) -> ApiResult<()> {
///     name.validate_non_empty("projectName")?;
///     // ... rest of logic
/// }
/// ```
pub trait ValidateNonEmpty {
    /// Validate that the value is non-empty.
    ///
    /// # Errors
    /// Returns `ApiError::missing_field` if the value is empty or
    /// whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.trim().is_empty() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for &str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        (*self).validate_non_empty(field_name)
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ApiError::missing_field(field_name)),
        }
    }
}
