//! Parley Core - Entity Types
//!
//! Pure data structures shared by the gateway, the relay API, and the
//! terminal client. This crate contains ONLY data types and the error
//! taxonomy - no I/O, no business logic.

mod entities;
mod error;
mod query;

pub use entities::{
    CaseId, CaseStatus, Entry, EntryId, EntryKind, Kase, Party, PartyId, Timestamp,
};
pub use error::{ConfigError, CrmError, ParleyError, ParleyResult, ValidationError};
pub use query::SearchQuery;
