use kernel::prelude::entity::{
    Actor, AssetId, AuditContext, BatchId, DraftId, LoanId, LoanRecord, MileageReading, UserId,
    UserName,
};

pub struct StartCheckoutDto {
    pub context: AuditContext,
    pub receiver_id: UserId,
    pub receiver_name: UserName,
    pub asset_ids: Vec<AssetId>,
}

pub struct StartReturnDto {
    pub context: AuditContext,
    pub loan_ids: Vec<LoanId>,
}

pub struct DraftDto {
    pub id: DraftId,
    pub actor: Actor,
}

pub struct SubmitReadingDto {
    pub id: DraftId,
    pub actor: Actor,
    pub reading: MileageReading,
}

pub struct CommitDraftDto {
    pub id: DraftId,
    pub context: AuditContext,
}

#[derive(Debug, Clone)]
pub struct CommittedBatchDto {
    /// Set for checkouts, which share one new batch.
    pub batch_id: Option<BatchId>,
    pub loans: Vec<LoanRecord>,
}
