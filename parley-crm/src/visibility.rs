//! Bounded read-poll for freshly created cases.
//!
//! The CRM is eventually consistent: a case id returned by a write is not
//! always immediately readable, and the dependent note write fails against
//! an invisible id. Instead of an unconditional sleep, the combined flow
//! polls the read path a bounded number of times.

use crate::config::VisibilityConfig;
use crate::CrmGateway;
use parley_core::{CaseId, CrmError, Kase};

/// Poll `get_case` until the id is readable.
///
/// Returns the case as soon as a read succeeds. Hard gateway failures
/// propagate immediately; only "not visible yet" is retried. Exhausting
/// the attempt budget is `CrmError::NotFound`.
pub async fn wait_until_visible(
    gateway: &dyn CrmGateway,
    case_id: CaseId,
    config: &VisibilityConfig,
) -> Result<Kase, CrmError> {
    for attempt in 1..=config.attempts {
        if let Some(kase) = gateway.get_case(case_id).await? {
            return Ok(kase);
        }

        tracing::debug!(%case_id, attempt, "case not visible yet");

        if attempt < config.attempts {
            tokio::time::sleep(config.backoff).await;
        }
    }

    Err(CrmError::NotFound {
        resource: format!("case {}", case_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_core::{CaseStatus, Entry, Party, PartyId, SearchQuery};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Gateway stub whose reads come up empty a fixed number of times.
    struct SlowlyVisible {
        misses: u32,
        reads: AtomicU32,
    }

    impl SlowlyVisible {
        fn new(misses: u32) -> Self {
            Self {
                misses,
                reads: AtomicU32::new(0),
            }
        }

        fn read_count(&self) -> u32 {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CrmGateway for SlowlyVisible {
        async fn search_parties(&self, _query: &SearchQuery) -> Result<Vec<Party>, CrmError> {
            unimplemented!("not used by visibility tests")
        }

        async fn create_case(&self, _party_id: PartyId, _name: &str) -> Result<Kase, CrmError> {
            unimplemented!("not used by visibility tests")
        }

        async fn get_case(&self, case_id: CaseId) -> Result<Option<Kase>, CrmError> {
            let read = self.reads.fetch_add(1, Ordering::SeqCst);
            if read < self.misses {
                Ok(None)
            } else {
                Ok(Some(Kase {
                    id: case_id,
                    name: "Renovation".to_string(),
                    party_id: PartyId::new(1),
                    status: CaseStatus::Open,
                }))
            }
        }

        async fn delete_case(&self, _case_id: CaseId) -> Result<(), CrmError> {
            unimplemented!("not used by visibility tests")
        }

        async fn create_party_note(
            &self,
            _party_id: PartyId,
            _content: &str,
        ) -> Result<Entry, CrmError> {
            unimplemented!("not used by visibility tests")
        }

        async fn create_case_note(
            &self,
            _case_id: CaseId,
            _content: &str,
        ) -> Result<Entry, CrmError> {
            unimplemented!("not used by visibility tests")
        }
    }

    fn config(attempts: u32) -> VisibilityConfig {
        VisibilityConfig {
            attempts,
            backoff: Duration::from_millis(200),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_immediately_when_visible() {
        let gateway = SlowlyVisible::new(0);
        let kase = wait_until_visible(&gateway, CaseId::new(7), &config(5))
            .await
            .unwrap();

        assert_eq!(kase.id, CaseId::new(7));
        assert_eq!(gateway.read_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_visible() {
        let gateway = SlowlyVisible::new(3);
        let kase = wait_until_visible(&gateway, CaseId::new(7), &config(5))
            .await
            .unwrap();

        assert_eq!(kase.id, CaseId::new(7));
        assert_eq!(gateway.read_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_attempt_budget() {
        let gateway = SlowlyVisible::new(10);
        let err = wait_until_visible(&gateway, CaseId::new(7), &config(3))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CrmError::NotFound {
                resource: "case 7".to_string(),
            }
        );
        assert_eq!(gateway.read_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hard_failures_are_not_retried() {
        struct Broken;

        #[async_trait]
        impl CrmGateway for Broken {
            async fn search_parties(&self, _q: &SearchQuery) -> Result<Vec<Party>, CrmError> {
                unimplemented!()
            }
            async fn create_case(&self, _p: PartyId, _n: &str) -> Result<Kase, CrmError> {
                unimplemented!()
            }
            async fn get_case(&self, _c: CaseId) -> Result<Option<Kase>, CrmError> {
                Err(CrmError::Unauthenticated)
            }
            async fn delete_case(&self, _c: CaseId) -> Result<(), CrmError> {
                unimplemented!()
            }
            async fn create_party_note(&self, _p: PartyId, _c: &str) -> Result<Entry, CrmError> {
                unimplemented!()
            }
            async fn create_case_note(&self, _c: CaseId, _n: &str) -> Result<Entry, CrmError> {
                unimplemented!()
            }
        }

        let err = wait_until_visible(&Broken, CaseId::new(7), &config(5))
            .await
            .unwrap_err();
        assert_eq!(err, CrmError::Unauthenticated);
    }
}
