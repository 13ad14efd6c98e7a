use destructure::Destructure;
use time::OffsetDateTime;
use vodca::References;

use crate::entity::{
    AuditContext, AuditMessage, ClientIp, EventVersion, LoanAction, LoanId, LoanRecord,
    SignatureHash, UserId,
};
use crate::event::LoanEvent;
use crate::signature::AuditSigner;

/// One line of a loan's audit trail.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct AuditEntry {
    loan_id: LoanId,
    version: EventVersion<LoanRecord>,
    event: LoanEvent,
    message: AuditMessage,
    actor_id: UserId,
    ip: Option<ClientIp>,
    occurred_at: OffsetDateTime,
    signature: SignatureHash,
}

impl AuditEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        loan_id: LoanId,
        version: EventVersion<LoanRecord>,
        event: LoanEvent,
        message: AuditMessage,
        actor_id: UserId,
        ip: Option<ClientIp>,
        occurred_at: OffsetDateTime,
        signature: SignatureHash,
    ) -> Self {
        Self {
            loan_id,
            version,
            event,
            message,
            actor_id,
            ip,
            occurred_at,
            signature,
        }
    }

    pub fn signed(
        loan_id: LoanId,
        version: EventVersion<LoanRecord>,
        event: LoanEvent,
        message: AuditMessage,
        context: &AuditContext,
        signer: &impl AuditSigner,
    ) -> Self {
        let entry = Self::new(
            loan_id,
            version,
            event,
            message,
            *context.actor().id(),
            context.ip().clone(),
            *context.at(),
            SignatureHash::default(),
        );
        let signature = signer.sign(entry.payload().as_bytes());
        Self { signature, ..entry }
    }

    pub fn action(&self) -> LoanAction {
        self.event.action()
    }

    /// Canonical text covered by the signature. Field order is fixed and the
    /// timestamp is cut to microseconds, the precision Postgres keeps. The
    /// event body is serialized from the typed value, so key order does not
    /// depend on how the store kept the JSON.
    pub fn payload(&self) -> SignaturePayload {
        let ip = self.ip.as_ref().map(|ip| ip.as_ref().as_str()).unwrap_or("-");
        let body = serde_json::to_string(&self.event).unwrap_or_default();
        SignaturePayload(format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}",
            self.loan_id,
            self.version.as_ref(),
            self.action(),
            self.actor_id,
            ip,
            self.occurred_at.unix_timestamp_nanos() / 1_000,
            self.message,
            body
        ))
    }

    pub fn verify(&self, signer: &impl AuditSigner) -> bool {
        signer.verify(self.payload().as_bytes(), &self.signature)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePayload(String);

impl SignaturePayload {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
