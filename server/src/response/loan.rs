use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{LoanBoardDto, LoanChangeDto};
use kernel::prelude::entity::{
    AssetId, AssetKind, BatchId, ClientIp, DestructLoanRecord, LoanDescription, LoanId, LoanMeta,
    LoanRecord, LoanStatus, SignatureHash, UserId, UserName,
};
use kernel::prelude::listing::LoanGroup;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct LoanResponse {
    id: LoanId,
    batch_id: BatchId,
    operator_id: UserId,
    receiver_id: UserId,
    receiver_name: UserName,
    asset_type: AssetKind,
    asset_id: AssetId,
    description: LoanDescription,
    #[serde(with = "time::serde::rfc3339")]
    checkout_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    return_time: Option<OffsetDateTime>,
    status: LoanStatus,
    meta: LoanMeta,
    created_ip: Option<ClientIp>,
    updated_ip: Option<ClientIp>,
    signature_hash: SignatureHash,
    version: i64,
}

impl From<LoanRecord> for LoanResponse {
    fn from(record: LoanRecord) -> Self {
        let DestructLoanRecord {
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
        } = record.into_destruct();
        Self {
            id,
            batch_id,
            operator_id,
            receiver_id,
            receiver_name,
            asset_type: asset_kind,
            asset_id,
            description,
            checkout_time: *checkout_time.as_ref(),
            return_time: return_time.map(|time| *time.as_ref()),
            status,
            meta,
            created_ip,
            updated_ip,
            signature_hash: signature,
            version: *version.as_ref(),
        }
    }
}

impl IntoResponse for LoanResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct LoanGroupResponse {
    key: Uuid,
    title: String,
    #[serde(with = "time::serde::rfc3339")]
    latest: OffsetDateTime,
    records: Vec<LoanResponse>,
}

impl From<LoanGroup> for LoanGroupResponse {
    fn from(group: LoanGroup) -> Self {
        Self {
            key: group.key,
            title: group.title,
            latest: group.latest,
            records: group.records.into_iter().map(LoanResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoanBoardResponse {
    pending: Vec<LoanGroupResponse>,
    active: Vec<LoanGroupResponse>,
    history: Vec<LoanGroupResponse>,
}

impl IntoResponse for LoanBoardResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct LoanChangeResponse {
    id: LoanId,
    /// Absent once the loan was cancelled.
    record: Option<LoanResponse>,
}

impl IntoResponse for LoanChangeResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct LoanPresenter;

impl Exhaust<Option<LoanRecord>> for LoanPresenter {
    type To = Option<LoanResponse>;
    fn emit(&self, input: Option<LoanRecord>) -> Self::To {
        input.map(LoanResponse::from)
    }
}

impl Exhaust<Vec<LoanRecord>> for LoanPresenter {
    type To = Json<Vec<LoanResponse>>;
    fn emit(&self, input: Vec<LoanRecord>) -> Self::To {
        Json(input.into_iter().map(LoanResponse::from).collect())
    }
}

impl Exhaust<LoanBoardDto> for LoanPresenter {
    type To = LoanBoardResponse;
    fn emit(&self, input: LoanBoardDto) -> Self::To {
        let groups = |groups: Vec<LoanGroup>| {
            groups
                .into_iter()
                .map(LoanGroupResponse::from)
                .collect::<Vec<_>>()
        };
        LoanBoardResponse {
            pending: groups(input.pending),
            active: groups(input.active),
            history: groups(input.history),
        }
    }
}

impl Exhaust<LoanChangeDto> for LoanPresenter {
    type To = LoanChangeResponse;
    fn emit(&self, input: LoanChangeDto) -> Self::To {
        LoanChangeResponse {
            id: input.id,
            record: input.record.map(LoanResponse::from),
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use uuid::Uuid;

    use kernel::prelude::entity::{
        AssetId, AssetKind, BatchId, CheckoutTime, EventVersion, Kilometers, LoanDescription,
        LoanId, LoanMeta, LoanRecord, LoanStatus, SignatureHash, UserId, UserName,
    };

    use super::LoanResponse;

    #[test]
    fn serializes_record_with_camel_case_meta() {
        let record = LoanRecord::new(
            LoanId::new(Uuid::new_v4()),
            BatchId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            UserName::new("Jane"),
            AssetKind::Vehicle,
            AssetId::new(Uuid::new_v4()),
            LoanDescription::new("Octavia 1AB 2345"),
            CheckoutTime::new(datetime!(2026-05-01 08:00 UTC)),
            None,
            LoanStatus::Active,
            LoanMeta {
                km_start: Some(Kilometers::new(1000)),
                ..LoanMeta::default()
            },
            None,
            None,
            SignatureHash::new("ab"),
            EventVersion::new(1),
        );
        let json = serde_json::to_value(LoanResponse::from(record)).unwrap();
        assert_eq!(json["asset_type"], "VEHICLE");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["checkout_time"], "2026-05-01T08:00:00Z");
        assert!(json["return_time"].is_null());
        assert_eq!(json["meta"]["kmStart"], 1000);
        assert_eq!(json["version"], 1);
    }
}
