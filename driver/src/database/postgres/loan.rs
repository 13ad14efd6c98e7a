use error_stack::Report;
use sqlx::types::Json;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::LoanQuery;
use kernel::interface::update::LoanModifier;
use kernel::prelude::entity::{
    AssetId, BatchId, CheckoutTime, ClientIp, DateRange, EventVersion, LoanDescription, LoanId,
    LoanMeta, LoanRecord, ReturnedAt, SelectLimit, SelectOffset, SignatureHash, UserId, UserName,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresLoanRepository;

#[async_trait::async_trait]
impl LoanQuery for PostgresLoanRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &LoanId,
    ) -> error_stack::Result<Option<LoanRecord>, KernelError> {
        PgLoanInternal::find_by_id(con, id).await
    }

    async fn find_by_ids(
        &self,
        con: &mut PostgresTransaction,
        ids: &[LoanId],
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        PgLoanInternal::find_by_ids(con, ids).await
    }

    async fn find_open(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        PgLoanInternal::find_open(con).await
    }

    async fn find_closed(
        &self,
        con: &mut PostgresTransaction,
        range: &DateRange,
        participant: Option<&UserId>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        PgLoanInternal::find_closed(con, range, participant, limit, offset).await
    }
}

#[async_trait::async_trait]
impl LoanModifier for PostgresLoanRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        loan: &LoanRecord,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanInternal::create(con, loan).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        loan: &LoanRecord,
        expected: &EventVersion<LoanRecord>,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanInternal::update(con, loan, expected).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        loan_id: &LoanId,
        expected: &EventVersion<LoanRecord>,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanInternal::delete(con, loan_id, expected).await
    }
}

#[derive(sqlx::FromRow)]
struct LoanRow {
    id: Uuid,
    batch_id: Uuid,
    operator_id: Uuid,
    receiver_id: Uuid,
    receiver_name: String,
    asset_type: String,
    item_id: Uuid,
    description: String,
    checkout_time: OffsetDateTime,
    return_time: Option<OffsetDateTime>,
    status: String,
    meta: Json<LoanMeta>,
    created_ip: Option<String>,
    updated_ip: Option<String>,
    signature_hash: String,
    version: i64,
}

impl TryFrom<LoanRow> for LoanRecord {
    type Error = Report<KernelError>;
    fn try_from(value: LoanRow) -> Result<Self, Self::Error> {
        Ok(LoanRecord::new(
            LoanId::new(value.id),
            BatchId::new(value.batch_id),
            UserId::new(value.operator_id),
            UserId::new(value.receiver_id),
            UserName::new(value.receiver_name),
            value.asset_type.parse()?,
            AssetId::new(value.item_id),
            LoanDescription::new(value.description),
            CheckoutTime::new(value.checkout_time),
            value.return_time.map(ReturnedAt::new),
            value.status.parse()?,
            value.meta.0,
            value.created_ip.map(ClientIp::new),
            value.updated_ip.map(ClientIp::new),
            SignatureHash::new(value.signature_hash),
            EventVersion::new(value.version),
        ))
    }
}

fn ip(ip: &Option<ClientIp>) -> Option<&str> {
    ip.as_ref().map(|ip| ip.as_ref().as_str())
}

fn concurrency(id: &LoanId, expected: &EventVersion<LoanRecord>) -> Report<KernelError> {
    tracing::warn!("stale write on loan {id} at version {}", expected.as_ref());
    Report::new(KernelError::Concurrency).attach_printable(format!(
        "Loan {id} is no longer at version {}",
        expected.as_ref()
    ))
}

pub(in crate::database) struct PgLoanInternal;

impl PgLoanInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &LoanId,
    ) -> error_stack::Result<Option<LoanRecord>, KernelError> {
        sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT id, batch_id, operator_id, receiver_id, receiver_name, asset_type, item_id,
                   description, checkout_time, return_time, status, meta, created_ip, updated_ip,
                   signature_hash, version
            FROM loan_records
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?
        .map(LoanRecord::try_from)
        .transpose()
    }

    async fn find_by_ids(
        con: &mut PgConnection,
        ids: &[LoanId],
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        let ids = ids.iter().map(|id| *id.as_ref()).collect::<Vec<Uuid>>();
        sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT id, batch_id, operator_id, receiver_id, receiver_name, asset_type, item_id,
                   description, checkout_time, return_time, status, meta, created_ip, updated_ip,
                   signature_hash, version
            FROM loan_records
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(con)
        .await
        .convert_error()?
        .into_iter()
        .map(LoanRecord::try_from)
        .collect()
    }

    async fn find_open(con: &mut PgConnection) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT id, batch_id, operator_id, receiver_id, receiver_name, asset_type, item_id,
                   description, checkout_time, return_time, status, meta, created_ip, updated_ip,
                   signature_hash, version
            FROM loan_records
            WHERE status IN ('PENDING', 'ACTIVE')
            ORDER BY checkout_time DESC
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?
        .into_iter()
        .map(LoanRecord::try_from)
        .collect()
    }

    async fn find_closed(
        con: &mut PgConnection,
        range: &DateRange,
        participant: Option<&UserId>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT id, batch_id, operator_id, receiver_id, receiver_name, asset_type, item_id,
                   description, checkout_time, return_time, status, meta, created_ip, updated_ip,
                   signature_hash, version
            FROM loan_records
            WHERE status IN ('COMPLETED', 'REJECTED')
              AND ($1::timestamptz IS NULL OR COALESCE(return_time, checkout_time) >= $1)
              AND ($2::timestamptz IS NULL OR COALESCE(return_time, checkout_time) <= $2)
              AND ($3::uuid IS NULL
                   OR operator_id = $3
                   OR receiver_id = $3
                   OR meta->>'pendingHandoverToUserId' = $3::text)
            ORDER BY COALESCE(return_time, checkout_time) DESC, id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(range.since())
        .bind(range.until())
        .bind(participant.map(|user| *AsRef::<Uuid>::as_ref(user)))
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?
        .into_iter()
        .map(LoanRecord::try_from)
        .collect()
    }

    async fn create(con: &mut PgConnection, loan: &LoanRecord) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO loan_records (
                id, batch_id, operator_id, receiver_id, receiver_name, asset_type, item_id,
                description, checkout_time, return_time, status, meta, created_ip, updated_ip,
                signature_hash, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(loan.id().as_ref())
        .bind(loan.batch_id().as_ref())
        .bind(loan.operator_id().as_ref())
        .bind(loan.receiver_id().as_ref())
        .bind(loan.receiver_name().as_ref())
        .bind(loan.asset_kind().as_str())
        .bind(loan.asset_id().as_ref())
        .bind(loan.description().as_ref())
        .bind(loan.checkout_time().as_ref())
        .bind(loan.return_time().map(|time| *time.as_ref()))
        .bind(loan.status().as_str())
        .bind(Json(loan.meta()))
        .bind(ip(loan.created_ip()))
        .bind(ip(loan.updated_ip()))
        .bind(loan.signature().as_ref())
        .bind(loan.version().as_ref())
        .execute(con)
        .await
        .convert_error()
        .map_err(|report| match report.current_context() {
            KernelError::Conflict => report
                .attach_printable(format!("Asset {} already has an open loan", loan.asset_id())),
            _ => report,
        })?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        loan: &LoanRecord,
        expected: &EventVersion<LoanRecord>,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE loan_records
            SET receiver_id = $2, receiver_name = $3, return_time = $4, status = $5, meta = $6,
                updated_ip = $7, signature_hash = $8, version = $9
            WHERE id = $1 AND version = $10
            "#,
        )
        .bind(loan.id().as_ref())
        .bind(loan.receiver_id().as_ref())
        .bind(loan.receiver_name().as_ref())
        .bind(loan.return_time().map(|time| *time.as_ref()))
        .bind(loan.status().as_str())
        .bind(Json(loan.meta()))
        .bind(ip(loan.updated_ip()))
        .bind(loan.signature().as_ref())
        .bind(loan.version().as_ref())
        .bind(expected.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(concurrency(loan.id(), expected));
        }
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        loan_id: &LoanId,
        expected: &EventVersion<LoanRecord>,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM loan_records
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(loan_id.as_ref())
        .bind(expected.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(concurrency(loan_id, expected));
        }
        Ok(())
    }
}
