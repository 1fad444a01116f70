//! Client Search Routes
//!
//! Relays free-text party search to the CRM and re-filters the results.
//! The CRM's own search is not guaranteed to be precise, so the handler
//! applies the normalized substring match a second time before returning.
//!
//! 404 policy: a CRM 404 on a search means "no matches" and is returned as
//! an empty 200, never as an error.

use axum::{extract::Query, extract::State, response::IntoResponse, routing::get, Json, Router};
use parley_core::{CrmError, Party, SearchQuery};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    types::{ClientSummary, SearchClientsParams},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /clients - Search parties by display name
#[utoipa::path(
    get,
    path = "/clients",
    tag = "Clients",
    params(SearchClientsParams),
    responses(
        (status = 200, description = "Matching clients", body = Vec<ClientSummary>),
        (status = 400, description = "Empty query", body = ApiError),
        (status = 401, description = "CRM rejected credential", body = ApiError),
        (status = 500, description = "CRM failure", body = ApiError),
    ),
)]
pub async fn search_clients(
    State(state): State<AppState>,
    Query(params): Query<SearchClientsParams>,
) -> ApiResult<impl IntoResponse> {
    // Validate before any network call is made.
    let query = SearchQuery::parse(params.query).map_err(ApiError::from)?;

    let parties = match state.gateway.search_parties(&query).await {
        Ok(parties) => parties,
        // "No matches" from the CRM is an empty success, not an error.
        Err(CrmError::NotFound { .. }) => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    Ok(Json(filter_clients(parties, &query)))
}

/// Defensive double-filter: keep only parties whose display name contains
/// the normalized query.
pub fn filter_clients(parties: Vec<Party>, query: &SearchQuery) -> Vec<ClientSummary> {
    parties
        .into_iter()
        .filter(|party| query.matches(&party.name))
        .map(ClientSummary::from)
        .collect()
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the client search router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_clients))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::PartyId;

    fn party(id: i64, name: &str) -> Party {
        Party {
            id: PartyId::new(id),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_filter_keeps_substring_matches_only() {
        let query = SearchQuery::parse("john").unwrap();
        let parties = vec![party(1, "John Doe"), party(2, "Jane")];

        let filtered = filter_clients(parties, &query);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, PartyId::new(1));
        assert_eq!(filtered[0].name, "John Doe");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let query = SearchQuery::parse("ACME").unwrap();
        let parties = vec![party(1, "acme ltd"), party(2, "Initech")];

        let filtered = filter_clients(parties, &query);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "acme ltd");
    }

    #[test]
    fn test_filter_drops_nameless_parties() {
        let query = SearchQuery::parse("john").unwrap();
        let parties = vec![party(1, ""), party(2, "Johnny")];

        let filtered = filter_clients(parties, &query);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, PartyId::new(2));
    }
}
