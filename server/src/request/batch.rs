use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CommitDraftDto, DraftDto, StartCheckoutDto, StartReturnDto, SubmitReadingDto,
};
use kernel::prelude::entity::{
    Actor, AssetId, AuditContext, DraftId, FuelRefill, Kilometers, LoanId, MileageReading, UserId,
    UserName,
};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct StartCheckoutRequest {
    receiver_id: Uuid,
    receiver_name: String,
    asset_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct StartReturnRequest {
    loan_ids: Vec<Uuid>,
}

#[derive(Debug)]
pub struct DraftRequest {
    id: Uuid,
}

impl DraftRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitReadingRequest {
    asset_id: Uuid,
    km: i64,
    #[serde(default)]
    fuel: Option<FuelRefill>,
    #[serde(default)]
    driver: Option<String>,
}

pub struct BatchTransformer;

impl Intake<(AuditContext, StartCheckoutRequest)> for BatchTransformer {
    type To = StartCheckoutDto;
    fn emit(&self, (context, input): (AuditContext, StartCheckoutRequest)) -> Self::To {
        StartCheckoutDto {
            context,
            receiver_id: UserId::new(input.receiver_id),
            receiver_name: UserName::new(input.receiver_name.trim()),
            asset_ids: input.asset_ids.into_iter().map(AssetId::new).collect(),
        }
    }
}

impl Intake<(AuditContext, StartReturnRequest)> for BatchTransformer {
    type To = StartReturnDto;
    fn emit(&self, (context, input): (AuditContext, StartReturnRequest)) -> Self::To {
        StartReturnDto {
            context,
            loan_ids: input.loan_ids.into_iter().map(LoanId::new).collect(),
        }
    }
}

impl Intake<(Actor, DraftRequest)> for BatchTransformer {
    type To = DraftDto;
    fn emit(&self, (actor, input): (Actor, DraftRequest)) -> Self::To {
        DraftDto {
            id: DraftId::new(input.id),
            actor,
        }
    }
}

impl Intake<(Actor, Uuid, SubmitReadingRequest)> for BatchTransformer {
    type To = SubmitReadingDto;
    fn emit(&self, (actor, id, input): (Actor, Uuid, SubmitReadingRequest)) -> Self::To {
        let driver = input
            .driver
            .map(|driver| driver.trim().to_string())
            .filter(|driver| !driver.is_empty());
        SubmitReadingDto {
            id: DraftId::new(id),
            actor,
            reading: MileageReading::new(
                AssetId::new(input.asset_id),
                Kilometers::new(input.km),
                input.fuel,
                driver,
            ),
        }
    }
}

impl Intake<(AuditContext, DraftRequest)> for BatchTransformer {
    type To = CommitDraftDto;
    fn emit(&self, (context, input): (AuditContext, DraftRequest)) -> Self::To {
        CommitDraftDto {
            id: DraftId::new(input.id),
            context,
        }
    }
}
