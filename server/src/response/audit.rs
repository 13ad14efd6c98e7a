use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

use application::transfer::VerifiedAuditEntryDto;
use kernel::interface::event::{DestructAuditEntry, LoanEvent};
use kernel::prelude::entity::{AuditMessage, ClientIp, LoanAction, LoanId, SignatureHash, UserId};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct AuditEntryResponse {
    loan_id: LoanId,
    version: i64,
    action: LoanAction,
    event: LoanEvent,
    message: AuditMessage,
    actor_id: UserId,
    ip: Option<ClientIp>,
    #[serde(with = "time::serde::rfc3339")]
    occurred_at: OffsetDateTime,
    signature: SignatureHash,
    verified: bool,
}

impl From<VerifiedAuditEntryDto> for AuditEntryResponse {
    fn from(input: VerifiedAuditEntryDto) -> Self {
        let action = input.entry.action();
        let DestructAuditEntry {
            loan_id,
            version,
            event,
            message,
            actor_id,
            ip,
            occurred_at,
            signature,
        } = input.entry.into_destruct();
        Self {
            loan_id,
            version: *version.as_ref(),
            action,
            event,
            message,
            actor_id,
            ip,
            occurred_at,
            signature,
            verified: input.verified,
        }
    }
}

pub struct AuditPresenter;

impl Exhaust<Vec<VerifiedAuditEntryDto>> for AuditPresenter {
    type To = Json<Vec<AuditEntryResponse>>;
    fn emit(&self, input: Vec<VerifiedAuditEntryDto>) -> Self::To {
        Json(input.into_iter().map(AuditEntryResponse::from).collect())
    }
}
