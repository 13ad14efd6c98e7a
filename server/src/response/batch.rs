use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

use application::transfer::CommittedBatchDto;
use kernel::prelude::entity::{
    AssetId, BatchDraft, BatchId, DraftId, DraftItem, DraftKind, Kilometers, LoanDescription,
    MileagePrompt, MileageReading, UserId, UserName,
};

use crate::controller::Exhaust;
use crate::response::LoanResponse;

#[derive(Debug, Serialize)]
pub struct MileagePromptResponse {
    asset_id: AssetId,
    description: LoanDescription,
    baseline_km: Option<Kilometers>,
    remaining: usize,
}

impl From<MileagePrompt> for MileagePromptResponse {
    fn from(prompt: MileagePrompt) -> Self {
        Self {
            asset_id: *prompt.asset_id(),
            description: prompt.description().clone(),
            baseline_km: *prompt.baseline_km(),
            remaining: *prompt.remaining(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    id: DraftId,
    kind: DraftKind,
    operator_id: UserId,
    receiver_id: Option<UserId>,
    receiver_name: Option<UserName>,
    items: Vec<DraftItem>,
    readings: Vec<MileageReading>,
    /// The vehicle whose mileage is asked for next.
    next_prompt: Option<MileagePromptResponse>,
    ready: bool,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl IntoResponse for DraftResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CommittedBatchResponse {
    batch_id: Option<BatchId>,
    loans: Vec<LoanResponse>,
}

impl IntoResponse for CommittedBatchResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

pub struct BatchPresenter;

impl Exhaust<BatchDraft> for BatchPresenter {
    type To = DraftResponse;
    fn emit(&self, input: BatchDraft) -> Self::To {
        DraftResponse {
            id: *input.id(),
            kind: *input.kind(),
            operator_id: *input.operator_id(),
            receiver_id: *input.receiver_id(),
            receiver_name: input.receiver_name().clone(),
            items: input.items().clone(),
            readings: input.readings().clone(),
            next_prompt: input.next_prompt().map(MileagePromptResponse::from),
            ready: input.is_ready(),
            created_at: *input.created_at(),
        }
    }
}

impl Exhaust<CommittedBatchDto> for BatchPresenter {
    type To = CommittedBatchResponse;
    fn emit(&self, input: CommittedBatchDto) -> Self::To {
        CommittedBatchResponse {
            batch_id: input.batch_id,
            loans: input.loans.into_iter().map(LoanResponse::from).collect(),
        }
    }
}

impl Exhaust<()> for BatchPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}
