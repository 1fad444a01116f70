//! Property tests for the defensive search filter.

use parley_api::routes::clients::filter_clients;
use parley_core::{Party, PartyId, SearchQuery};
use proptest::prelude::*;

fn parties(names: &[String]) -> Vec<Party> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Party {
            id: PartyId::new(i as i64 + 1),
            name: name.clone(),
        })
        .collect()
}

proptest! {
    /// Every surviving record's name contains the normalized query.
    #[test]
    fn filtered_results_all_match(
        raw_query in "[a-zA-Z ]{1,10}",
        names in proptest::collection::vec("[a-zA-Z ]{0,30}", 0..20),
    ) {
        if let Ok(query) = SearchQuery::parse(raw_query) {
            let filtered = filter_clients(parties(&names), &query);

            for client in &filtered {
                prop_assert!(
                    client.name.to_lowercase().contains(query.normalized()),
                    "{:?} does not contain {:?}",
                    client.name,
                    query.normalized(),
                );
            }
        }
    }

    /// No matching record is dropped: the filter keeps exactly the
    /// matching subset, in order.
    #[test]
    fn filter_keeps_exactly_the_matching_subset(
        raw_query in "[a-zA-Z ]{1,10}",
        names in proptest::collection::vec("[a-zA-Z ]{0,30}", 0..20),
    ) {
        if let Ok(query) = SearchQuery::parse(raw_query) {
            let filtered = filter_clients(parties(&names), &query);

            let expected: Vec<&String> = names
                .iter()
                .filter(|n| n.to_lowercase().contains(query.normalized()))
                .collect();

            let got: Vec<&String> = filtered.iter().map(|c| &c.name).collect();
            prop_assert_eq!(got, expected);
        }
    }

    /// Filtering is idempotent.
    #[test]
    fn filter_is_idempotent(
        raw_query in "[a-zA-Z ]{1,10}",
        names in proptest::collection::vec("[a-zA-Z ]{0,30}", 0..20),
    ) {
        if let Ok(query) = SearchQuery::parse(raw_query) {
            let once = filter_clients(parties(&names), &query);
            let again = filter_clients(
                once.iter()
                    .map(|c| Party { id: c.id, name: c.name.clone() })
                    .collect(),
                &query,
            );
            prop_assert_eq!(once, again);
        }
    }
}
