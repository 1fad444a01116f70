//! Combined case+note creation flow.
//!
//! Ordering guarantee: the note write is never attempted before the case
//! write has returned an id AND the id has become readable (the CRM is
//! eventually consistent between its write and read paths).
//!
//! Partial-failure rule: if the note write fails after the case exists,
//! the flow deletes the just-created case and reports the note error.
//! Compensation is best-effort; a failed rollback is logged and noted in
//! the error details so an operator can clean up.

use parley_core::{Entry, Kase, PartyId};
use parley_crm::{wait_until_visible, CrmGateway, VisibilityConfig};

use crate::error::{ApiError, ApiResult};

/// Outcome of the combined flow.
#[derive(Debug, Clone)]
pub struct CaseWithNote {
    pub kase: Kase,
    pub entry: Entry,
}

/// Create a case, wait for it to become visible, then attach its first note.
pub async fn create_case_with_note(
    gateway: &dyn CrmGateway,
    visibility: &VisibilityConfig,
    party_id: PartyId,
    project_name: &str,
    note_content: &str,
) -> ApiResult<CaseWithNote> {
    let kase = gateway
        .create_case(party_id, project_name)
        .await
        .map_err(ApiError::from)?;

    let kase = match wait_until_visible(gateway, kase.id, visibility).await {
        Ok(kase) => kase,
        Err(err) => {
            // The case exists but never became readable; roll it back
            // rather than leave an orphan we could not attach a note to.
            let rolled_back = compensate(gateway, &kase).await;
            return Err(flow_error(
                ApiError::remote_failure(format!(
                    "Case {} was created but never became visible: {}",
                    kase.id, err
                )),
                rolled_back,
                &kase,
            ));
        }
    };

    match gateway.create_case_note(kase.id, note_content).await {
        Ok(entry) => Ok(CaseWithNote { kase, entry }),
        Err(err) => {
            let rolled_back = compensate(gateway, &kase).await;
            Err(flow_error(ApiError::from(err), rolled_back, &kase))
        }
    }
}

/// Best-effort rollback of an orphaned case. Returns whether the delete
/// succeeded.
async fn compensate(gateway: &dyn CrmGateway, kase: &Kase) -> bool {
    match gateway.delete_case(kase.id).await {
        Ok(()) => {
            tracing::warn!(case_id = %kase.id, "rolled back orphaned case");
            true
        }
        Err(err) => {
            tracing::error!(case_id = %kase.id, error = %err, "failed to roll back orphaned case");
            false
        }
    }
}

fn flow_error(err: ApiError, rolled_back: bool, kase: &Kase) -> ApiError {
    err.with_details(serde_json::json!({
        "caseId": kase.id,
        "rolledBack": rolled_back,
    }))
}
