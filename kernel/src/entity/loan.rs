mod description;
mod id;
mod meta;
mod status;
mod time;

pub use self::{description::*, id::*, meta::*, status::*, time::*};
use crate::entity::{AssetId, AssetKind, ClientIp, EventVersion, SignatureHash, UserId, UserName};
use destructure::{Destructure, Mutation};
use vodca::References;

/// One asset's checkout/return cycle.
#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct LoanRecord {
    id: LoanId,
    batch_id: BatchId,
    operator_id: UserId,
    receiver_id: UserId,
    receiver_name: UserName,
    asset_kind: AssetKind,
    asset_id: AssetId,
    description: LoanDescription,
    checkout_time: CheckoutTime,
    return_time: Option<ReturnedAt>,
    status: LoanStatus,
    meta: LoanMeta,
    created_ip: Option<ClientIp>,
    updated_ip: Option<ClientIp>,
    signature: SignatureHash,
    version: EventVersion<LoanRecord>,
}

impl LoanRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LoanId,
        batch_id: BatchId,
        operator_id: UserId,
        receiver_id: UserId,
        receiver_name: UserName,
        asset_kind: AssetKind,
        asset_id: AssetId,
        description: LoanDescription,
        checkout_time: CheckoutTime,
        return_time: Option<ReturnedAt>,
        status: LoanStatus,
        meta: LoanMeta,
        created_ip: Option<ClientIp>,
        updated_ip: Option<ClientIp>,
        signature: SignatureHash,
        version: EventVersion<LoanRecord>,
    ) -> Self {
        Self {
            id,
            batch_id,
            operator_id,
            receiver_id,
            receiver_name,
            asset_kind,
            asset_id,
            description,
            checkout_time,
            return_time,
            status,
            meta,
            created_ip,
            updated_ip,
            signature,
            version,
        }
    }

    /// Whether `user` takes part in this loan: operator, receiver or the
    /// pending handover target.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.operator_id == user
            || &self.receiver_id == user
            || self.meta.pending_handover_to_user_id.as_ref() == Some(user)
    }
}
