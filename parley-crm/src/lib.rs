//! Parley CRM - gateway to the remote CRM's REST API
//!
//! Defines the `CrmGateway` trait the relay handlers program against, plus
//! the Capsule-backed implementation. Each gateway operation issues exactly
//! one authenticated HTTP request: no retries, no batching, no state kept
//! between calls. The one exception is [`wait_until_visible`], a bounded
//! read-poll used by the combined case+note flow.

use async_trait::async_trait;
use parley_core::{CaseId, CrmError, Entry, Kase, Party, PartyId, SearchQuery};

mod capsule;
mod config;
mod visibility;
mod wire;

pub use capsule::CapsuleClient;
pub use config::{CrmConfig, VisibilityConfig, DEFAULT_BASE_URL};
pub use visibility::wait_until_visible;

/// Outbound operations against the remote CRM.
///
/// Implementations must be thread-safe (Send + Sync); the relay shares one
/// instance across all requests. Test code substitutes a mock.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    /// Search parties by free text. Returns whatever the CRM matched;
    /// callers apply their own filtering on top.
    async fn search_parties(&self, query: &SearchQuery) -> Result<Vec<Party>, CrmError>;

    /// Create a case owned by the given party, with status fixed to open.
    ///
    /// A write that succeeds but yields no id is `CrmError::MissingId`,
    /// treated as a hard failure.
    async fn create_case(&self, party_id: PartyId, name: &str) -> Result<Kase, CrmError>;

    /// Read a case back by id. A remote 404 is `Ok(None)`, not an error -
    /// this is what the visibility poll spins on.
    async fn get_case(&self, case_id: CaseId) -> Result<Option<Kase>, CrmError>;

    /// Delete a case. Used only as the compensation step of the combined
    /// case+note flow.
    async fn delete_case(&self, case_id: CaseId) -> Result<(), CrmError>;

    /// Attach a note entry to a party.
    async fn create_party_note(&self, party_id: PartyId, content: &str)
        -> Result<Entry, CrmError>;

    /// Attach a note entry to a case.
    async fn create_case_note(&self, case_id: CaseId, content: &str) -> Result<Entry, CrmError>;
}
