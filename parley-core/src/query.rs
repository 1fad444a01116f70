//! Search query normalization.
//!
//! The remote CRM's party search is not guaranteed to be precise, so every
//! result set is filtered a second time against the normalized query. That
//! normalization (trim + lowercase) lives here so the relay handlers and
//! the terminal client agree on it.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A validated, normalized search query.
///
/// Construction fails on empty or whitespace-only input; a `SearchQuery`
/// in hand is always dispatchable. Ephemeral - never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    raw: String,
    normalized: String,
}

impl SearchQuery {
    /// Parse a raw query string, trimming and lower-casing it.
    ///
    /// # Errors
    /// Returns `ValidationError::RequiredFieldMissing` if the input is
    /// empty after trimming.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "query".to_string(),
            });
        }
        Ok(Self { raw, normalized })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Case-insensitive substring match against a display name.
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.normalized)
    }
}
