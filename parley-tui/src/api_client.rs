//! REST client for the Parley relay API.

use crate::config::TuiConfig;
use parley_api::error::ApiError as ApiServerError;
use parley_api::types::{
    ClientSummary, CreateCommentRequest, CreateCommentResponse, CreateProjectWithNoteRequest,
    CreateProjectWithNoteResponse,
};
use parley_core::PartyId;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The relay answered with its structured error envelope.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET /clients?query=...
    pub async fn search_clients(&self, query: &str) -> Result<Vec<ClientSummary>, ApiClientError> {
        let response = self
            .client
            .get(format!("{}/clients", self.base_url))
            .query(&[("query", query)])
            .send()
            .await?;

        parse_response(response).await
    }

    /// POST /comments
    pub async fn create_comment(
        &self,
        client_id: PartyId,
        comment: &str,
    ) -> Result<CreateCommentResponse, ApiClientError> {
        let body = CreateCommentRequest {
            client_id,
            comment: comment.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/comments", self.base_url))
            .json(&body)
            .send()
            .await?;

        parse_response(response).await
    }

    /// POST /projects/with-note
    pub async fn create_project_with_note(
        &self,
        client_id: PartyId,
        project_name: &str,
        note_content: &str,
    ) -> Result<CreateProjectWithNoteResponse, ApiClientError> {
        let body = CreateProjectWithNoteRequest {
            client_id,
            project_name: project_name.to_string(),
            note_content: note_content.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/projects/with-note", self.base_url))
            .json(&body)
            .send()
            .await?;

        parse_response(response).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiClientError> {
    let status = response.status();

    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiServerError>(&body) {
            Ok(envelope) => envelope.message,
            Err(_) if body.is_empty() => format!("server returned {}", status),
            Err(_) => body,
        };

        Err(ApiClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
