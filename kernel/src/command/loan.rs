use crate::entity::{
    AssetId, AssetKind, BatchId, FuelRefill, Kilometers, LoanDescription, LoanId, UserId, UserName,
};

/// Requests to move a loan record through its lifecycle. The acting user and
/// origin travel separately in an `AuditContext`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoanCommand {
    Request {
        id: LoanId,
        batch_id: BatchId,
        receiver_id: UserId,
        receiver_name: UserName,
        asset_kind: AssetKind,
        asset_id: AssetId,
        description: LoanDescription,
        km_start: Option<Kilometers>,
        driver: Option<String>,
    },
    Confirm,
    Reject,
    Cancel,
    Return {
        km_end: Option<Kilometers>,
        fuel: Option<FuelRefill>,
    },
    RequestHandover {
        to_user_id: UserId,
        to_name: UserName,
    },
    AcceptHandover,
    DeclineHandover,
}
