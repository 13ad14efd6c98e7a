use kernel::interface::command::LoanCommand;
use kernel::prelude::entity::{
    Actor, AuditContext, LoanId, LoanRecord, SelectLimit, SelectOffset,
};
use kernel::prelude::listing::{GroupBy, LoanFilter, LoanGroup};

pub struct GetLoanDto {
    pub id: LoanId,
    pub actor: Actor,
}

#[derive(Debug)]
pub struct GetBoardDto {
    pub actor: Actor,
    pub filter: LoanFilter,
    pub group_by: GroupBy,
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

/// Grouped records for one tab. The active tab fills `pending` and `active`,
/// the history tab fills `history`.
#[derive(Debug, Clone, Default)]
pub struct LoanBoardDto {
    pub pending: Vec<LoanGroup>,
    pub active: Vec<LoanGroup>,
    pub history: Vec<LoanGroup>,
}

/// The same command applied to several records in one transaction.
pub struct BulkLoanDto {
    pub ids: Vec<LoanId>,
    pub context: AuditContext,
}

#[derive(Debug)]
pub struct LoanCommandDto {
    pub id: LoanId,
    pub command: LoanCommand,
    pub context: AuditContext,
}

#[derive(Debug, Clone)]
pub struct LoanChangeDto {
    pub id: LoanId,
    /// `None` once the record was cancelled.
    pub record: Option<LoanRecord>,
}
