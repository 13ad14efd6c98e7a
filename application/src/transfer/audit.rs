use kernel::interface::event::AuditEntry;
use kernel::prelude::entity::{Actor, LoanId};

pub struct GetAuditTrailDto {
    pub id: LoanId,
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct VerifiedAuditEntryDto {
    pub entry: AuditEntry,
    pub verified: bool,
}
