//! Parley Test Utilities
//!
//! Centralized test infrastructure for the Parley workspace:
//! - `MockCrmGateway` with scripted responses and call recording
//! - Entity fixtures for common scenarios

use async_trait::async_trait;
use parley_core::{
    CaseId, CaseStatus, CrmError, Entry, EntryId, EntryKind, Kase, Party, PartyId, SearchQuery,
};
use parley_crm::CrmGateway;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// FIXTURES
// ============================================================================

pub fn party(id: i64, name: &str) -> Party {
    Party {
        id: PartyId::new(id),
        name: name.to_string(),
    }
}

pub fn kase(id: i64, party_id: i64, name: &str) -> Kase {
    Kase {
        id: CaseId::new(id),
        name: name.to_string(),
        party_id: PartyId::new(party_id),
        status: CaseStatus::Open,
    }
}

pub fn entry(id: i64, content: &str) -> Entry {
    Entry {
        id: EntryId::new(id),
        kind: EntryKind::Note,
        content: content.to_string(),
        created_at: None,
    }
}

// ============================================================================
// MOCK GATEWAY
// ============================================================================

/// Record of a single gateway invocation, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    SearchParties { query: String },
    CreateCase { party_id: PartyId, name: String },
    GetCase { case_id: CaseId },
    DeleteCase { case_id: CaseId },
    CreatePartyNote { party_id: PartyId, content: String },
    CreateCaseNote { case_id: CaseId, content: String },
}

/// Scripted in-memory `CrmGateway` for handler and flow tests.
///
/// Every operation records its call. Responses default to benign values
/// and can be overridden per operation; `get_case` additionally accepts a
/// queue of scripted reads so visibility polling can be exercised.
pub struct MockCrmGateway {
    calls: Mutex<Vec<GatewayCall>>,
    search_response: Mutex<Result<Vec<Party>, CrmError>>,
    create_case_response: Mutex<Result<Kase, CrmError>>,
    get_case_script: Mutex<VecDeque<Result<Option<Kase>, CrmError>>>,
    delete_case_response: Mutex<Result<(), CrmError>>,
    party_note_response: Mutex<Result<Entry, CrmError>>,
    case_note_response: Mutex<Result<Entry, CrmError>>,
}

impl MockCrmGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            search_response: Mutex::new(Ok(Vec::new())),
            create_case_response: Mutex::new(Ok(kase(100, 1, "Scripted case"))),
            get_case_script: Mutex::new(VecDeque::new()),
            delete_case_response: Mutex::new(Ok(())),
            party_note_response: Mutex::new(Ok(entry(500, "scripted note"))),
            case_note_response: Mutex::new(Ok(entry(600, "scripted note"))),
        }
    }

    // ------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------

    pub fn with_search_results(self, parties: Vec<Party>) -> Self {
        *self.search_response.lock().unwrap() = Ok(parties);
        self
    }

    pub fn with_search_error(self, err: CrmError) -> Self {
        *self.search_response.lock().unwrap() = Err(err);
        self
    }

    pub fn with_created_case(self, kase: Kase) -> Self {
        *self.create_case_response.lock().unwrap() = Ok(kase);
        self
    }

    pub fn with_create_case_error(self, err: CrmError) -> Self {
        *self.create_case_response.lock().unwrap() = Err(err);
        self
    }

    /// Queue scripted `get_case` reads, consumed in order. Once the queue
    /// is empty, reads fall back to echoing the scripted created case.
    pub fn with_case_reads(self, reads: Vec<Result<Option<Kase>, CrmError>>) -> Self {
        *self.get_case_script.lock().unwrap() = reads.into();
        self
    }

    pub fn with_delete_case_error(self, err: CrmError) -> Self {
        *self.delete_case_response.lock().unwrap() = Err(err);
        self
    }

    pub fn with_party_note(self, entry: Entry) -> Self {
        *self.party_note_response.lock().unwrap() = Ok(entry);
        self
    }

    pub fn with_party_note_error(self, err: CrmError) -> Self {
        *self.party_note_response.lock().unwrap() = Err(err);
        self
    }

    pub fn with_case_note(self, entry: Entry) -> Self {
        *self.case_note_response.lock().unwrap() = Ok(entry);
        self
    }

    pub fn with_case_note_error(self, err: CrmError) -> Self {
        *self.case_note_response.lock().unwrap() = Err(err);
        self
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockCrmGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CrmGateway for MockCrmGateway {
    async fn search_parties(&self, query: &SearchQuery) -> Result<Vec<Party>, CrmError> {
        self.record(GatewayCall::SearchParties {
            query: query.normalized().to_string(),
        });
        self.search_response.lock().unwrap().clone()
    }

    async fn create_case(&self, party_id: PartyId, name: &str) -> Result<Kase, CrmError> {
        self.record(GatewayCall::CreateCase {
            party_id,
            name: name.to_string(),
        });
        self.create_case_response.lock().unwrap().clone()
    }

    async fn get_case(&self, case_id: CaseId) -> Result<Option<Kase>, CrmError> {
        self.record(GatewayCall::GetCase { case_id });

        if let Some(scripted) = self.get_case_script.lock().unwrap().pop_front() {
            return scripted;
        }

        // Fall back to echoing whatever create_case is scripted to return.
        match self.create_case_response.lock().unwrap().clone() {
            Ok(kase) => Ok(Some(kase)),
            Err(_) => Ok(None),
        }
    }

    async fn delete_case(&self, case_id: CaseId) -> Result<(), CrmError> {
        self.record(GatewayCall::DeleteCase { case_id });
        self.delete_case_response.lock().unwrap().clone()
    }

    async fn create_party_note(
        &self,
        party_id: PartyId,
        content: &str,
    ) -> Result<Entry, CrmError> {
        self.record(GatewayCall::CreatePartyNote {
            party_id,
            content: content.to_string(),
        });
        self.party_note_response.lock().unwrap().clone()
    }

    async fn create_case_note(&self, case_id: CaseId, content: &str) -> Result<Entry, CrmError> {
        self.record(GatewayCall::CreateCaseNote {
            case_id,
            content: content.to_string(),
        });
        self.case_note_response.lock().unwrap().clone()
    }
}
