use error_stack::Report;
use sqlx::types::Json;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::event::{AuditEntry, LoanEvent};
use kernel::interface::query::LoanEventQuery;
use kernel::interface::update::LoanEventModifier;
use kernel::prelude::entity::{
    AuditMessage, ClientIp, EventVersion, LoanId, SignatureHash, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresLoanEventRepository;

#[async_trait::async_trait]
impl LoanEventQuery for PostgresLoanEventRepository {
    type Transaction = PostgresTransaction;

    async fn get_events(
        &self,
        con: &mut PostgresTransaction,
        id: &LoanId,
    ) -> error_stack::Result<Vec<AuditEntry>, KernelError> {
        PgLoanEventInternal::get_events(con, id).await
    }
}

#[async_trait::async_trait]
impl LoanEventModifier for PostgresLoanEventRepository {
    type Transaction = PostgresTransaction;

    async fn append(
        &self,
        con: &mut PostgresTransaction,
        entry: &AuditEntry,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanEventInternal::append(con, entry).await
    }
}

#[derive(sqlx::FromRow)]
struct LoanEventRow {
    loan_id: Uuid,
    version: i64,
    event: Json<LoanEvent>,
    message: String,
    actor_id: Uuid,
    ip: Option<String>,
    occurred_at: OffsetDateTime,
    signature_hash: String,
}

impl From<LoanEventRow> for AuditEntry {
    fn from(value: LoanEventRow) -> Self {
        AuditEntry::new(
            LoanId::new(value.loan_id),
            EventVersion::new(value.version),
            value.event.0,
            AuditMessage::new(value.message),
            UserId::new(value.actor_id),
            value.ip.map(ClientIp::new),
            value.occurred_at,
            SignatureHash::new(value.signature_hash),
        )
    }
}

pub(in crate::database) struct PgLoanEventInternal;

impl PgLoanEventInternal {
    async fn get_events(
        con: &mut PgConnection,
        id: &LoanId,
    ) -> error_stack::Result<Vec<AuditEntry>, KernelError> {
        let rows = sqlx::query_as::<_, LoanEventRow>(
            // language=postgresql
            r#"
            SELECT loan_id, version, event, message, actor_id, ip, occurred_at, signature_hash
            FROM loan_events
            WHERE loan_id = $1
            ORDER BY version
            "#,
        )
        .bind(id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(AuditEntry::from).collect())
    }

    async fn append(con: &mut PgConnection, entry: &AuditEntry) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO loan_events (
                loan_id, version, action, event, message, actor_id, ip, occurred_at, signature_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.loan_id().as_ref())
        .bind(entry.version().as_ref())
        .bind(entry.action().as_str())
        .bind(Json(entry.event()))
        .bind(entry.message().as_ref())
        .bind(entry.actor_id().as_ref())
        .bind(entry.ip().as_ref().map(|ip| ip.as_ref().as_str()))
        .bind(entry.occurred_at())
        .bind(entry.signature().as_ref())
        .execute(con)
        .await
        .convert_error()
        .map_err(|report| {
            if report.current_context() != &KernelError::Conflict {
                return report;
            }
            Report::new(KernelError::Concurrency).attach_printable(format!(
                "Loan {} already has version {}",
                entry.loan_id(),
                entry.version().as_ref()
            ))
        })?;
        Ok(())
    }
}
