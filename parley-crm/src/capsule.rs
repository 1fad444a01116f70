//! Capsule HTTP client

use crate::config::CrmConfig;
use crate::wire::{
    CreateCaseBody, CreateCaseNoteBody, CreatePartyNoteBody, CrmErrorWire, EntryEnvelope,
    KaseEnvelope, PartiesEnvelope,
};
use crate::CrmGateway;
use async_trait::async_trait;
use parley_core::{CaseId, CrmError, Entry, Kase, Party, PartyId, SearchQuery};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Page size requested from the CRM's party search.
const SEARCH_PAGE_SIZE: u32 = 50;

/// Capsule-backed implementation of [`CrmGateway`].
///
/// One authenticated request per operation; the bearer token is attached
/// per call and no state is retained between calls.
pub struct CapsuleClient {
    client: Client,
    config: CrmConfig,
}

impl CapsuleClient {
    /// Create a new client from config.
    pub fn new(config: CrmConfig) -> Result<Self, CrmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CrmError::Transport {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Visibility-poll tuning carried alongside the credentials.
    pub fn visibility(&self) -> crate::VisibilityConfig {
        self.config.visibility
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    async fn get_json<Res: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Res, CrmError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(self.config.token.expose_secret())
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        handle_response(response).await
    }

    async fn post_json<Req: Serialize, Res: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Res, CrmError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(self.config.token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        handle_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<StatusCode, CrmError> {
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(self.config.token.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(status)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(error_for_status(status, &body))
        }
    }
}

#[async_trait]
impl CrmGateway for CapsuleClient {
    async fn search_parties(&self, query: &SearchQuery) -> Result<Vec<Party>, CrmError> {
        let params = [
            ("q", query.normalized().to_string()),
            ("perPage", SEARCH_PAGE_SIZE.to_string()),
        ];

        let envelope: PartiesEnvelope = self.get_json("parties/search", &params).await?;
        Ok(envelope
            .parties
            .into_iter()
            .map(|wire| wire.into_party())
            .collect())
    }

    async fn create_case(&self, party_id: PartyId, name: &str) -> Result<Kase, CrmError> {
        let body = CreateCaseBody::new(party_id, name);
        let envelope: KaseEnvelope = self.post_json("kases", &body).await?;
        envelope.kase.into_kase(party_id, name)
    }

    async fn get_case(&self, case_id: CaseId) -> Result<Option<Kase>, CrmError> {
        let path = format!("kases/{}", case_id);
        match self.get_json::<KaseEnvelope>(&path, &[]).await {
            Ok(envelope) => {
                // The read path has no request fields to fall back on.
                let kase = envelope
                    .kase
                    .into_kase(PartyId::new(0), "")
                    .map_err(|_| CrmError::InvalidResponse {
                        reason: format!("case {} response carried no id", case_id),
                    })?;
                Ok(Some(kase))
            }
            Err(CrmError::NotFound { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    async fn delete_case(&self, case_id: CaseId) -> Result<(), CrmError> {
        let path = format!("kases/{}", case_id);
        self.delete(&path).await?;
        Ok(())
    }

    async fn create_party_note(
        &self,
        party_id: PartyId,
        content: &str,
    ) -> Result<Entry, CrmError> {
        let body = CreatePartyNoteBody::new(party_id, content);
        let envelope: EntryEnvelope = self.post_json("entries", &body).await?;
        envelope.entry.into_entry(content)
    }

    async fn create_case_note(&self, case_id: CaseId, content: &str) -> Result<Entry, CrmError> {
        let body = CreateCaseNoteBody::new(case_id, content);
        let envelope: EntryEnvelope = self.post_json("entries", &body).await?;
        envelope.entry.into_entry(content)
    }
}

impl std::fmt::Debug for CapsuleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapsuleClient")
            .field("base_url", &self.config.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// RESPONSE HANDLING
// ============================================================================

fn transport_error(err: reqwest::Error) -> CrmError {
    CrmError::Transport {
        message: err.to_string(),
    }
}

async fn handle_response<Res: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Res, CrmError> {
    let status = response.status();

    if status.is_success() {
        response.json().await.map_err(|e| CrmError::InvalidResponse {
            reason: format!("failed to parse response: {}", e),
        })
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }
}

/// Map a non-2xx CRM status to the uniform error shape, pulling the CRM's
/// own message out of the body when it parses.
fn error_for_status(status: StatusCode, body: &str) -> CrmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CrmError::Unauthenticated,
        StatusCode::NOT_FOUND => CrmError::NotFound {
            resource: "requested resource".to_string(),
        },
        _ => CrmError::RequestFailed {
            status: status.as_u16(),
            message: extract_message(body),
        },
    }
}

fn extract_message(body: &str) -> String {
    if let Ok(wire) = serde_json::from_str::<CrmErrorWire>(body) {
        if let Some(message) = wire.message {
            return message;
        }
    }
    if body.is_empty() {
        "unknown error".to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping_for_auth_statuses() {
        assert_eq!(
            error_for_status(StatusCode::UNAUTHORIZED, ""),
            CrmError::Unauthenticated
        );
        assert_eq!(
            error_for_status(StatusCode::FORBIDDEN, ""),
            CrmError::Unauthenticated
        );
    }

    #[test]
    fn test_error_mapping_for_not_found() {
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, ""),
            CrmError::NotFound { .. }
        ));
    }

    #[test]
    fn test_error_mapping_extracts_crm_message() {
        let err = error_for_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "name is required"}"#,
        );
        assert_eq!(
            err,
            CrmError::RequestFailed {
                status: 422,
                message: "name is required".to_string(),
            }
        );
    }

    #[test]
    fn test_error_mapping_falls_back_to_raw_body() {
        let err = error_for_status(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(
            err,
            CrmError::RequestFailed {
                status: 502,
                message: "upstream exploded".to_string(),
            }
        );
    }

    #[test]
    fn test_error_mapping_empty_body() {
        let err = error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            err,
            CrmError::RequestFailed {
                status: 500,
                message: "unknown error".to_string(),
            }
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let client =
            CapsuleClient::new(CrmConfig::new("https://crm.example.com", "hunter2")).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
