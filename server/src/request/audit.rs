use uuid::Uuid;

use application::transfer::GetAuditTrailDto;
use kernel::prelude::entity::{Actor, LoanId};

use crate::controller::Intake;

#[derive(Debug)]
pub struct GetAuditTrailRequest {
    id: Uuid,
}

impl GetAuditTrailRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct AuditTransformer;

impl Intake<(Actor, GetAuditTrailRequest)> for AuditTransformer {
    type To = GetAuditTrailDto;
    fn emit(&self, (actor, input): (Actor, GetAuditTrailRequest)) -> Self::To {
        GetAuditTrailDto {
            id: LoanId::new(input.id),
            actor,
        }
    }
}
