use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnLoanEventQuery, DependOnLoanQuery, LoanEventQuery, LoanQuery};
use kernel::interface::event::{AuditEntry, LoanEvent};
use kernel::interface::signature::DependOnAuditSigner;
use kernel::prelude::entity::Actor;
use kernel::prelude::listing::LoanFilter;
use kernel::KernelError;

use crate::transfer::{GetAuditTrailDto, VerifiedAuditEntryDto};

#[async_trait::async_trait]
pub trait AuditTrailService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnLoanQuery
    + DependOnLoanEventQuery
    + DependOnAuditSigner
{
    /// Entries of one loan in version order, each re-checked against its
    /// signature.
    async fn audit_trail(
        &self,
        dto: GetAuditTrailDto,
    ) -> error_stack::Result<Vec<VerifiedAuditEntryDto>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let record = self.loan_query().find_by_id(&mut con, &dto.id).await?;
        let entries = self.loan_event_query().get_events(&mut con, &dto.id).await?;
        con.commit().await?;

        if record.is_none() && entries.is_empty() {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Loan {} has no history", dto.id)));
        }
        // Cancelled loans no longer have a record, only their trail.
        let allowed = match &record {
            Some(record) => LoanFilter::visible_to(&dto.actor, record),
            None => {
                dto.actor.is_manager()
                    || entries.iter().any(|entry| took_part(entry, &dto.actor))
            }
        };
        if !allowed {
            return Err(Report::new(KernelError::Forbidden)
                .attach_printable(format!("Loan {} belongs to other users", dto.id)));
        }
        Ok(entries
            .into_iter()
            .map(|entry| VerifiedAuditEntryDto {
                verified: entry.verify(self.audit_signer()),
                entry,
            })
            .collect())
    }
}

impl<T> AuditTrailService for T where
    T: DependOnDatabaseConnection
        + DependOnLoanQuery
        + DependOnLoanEventQuery
        + DependOnAuditSigner
{
}

/// Whether `actor` wrote `entry` or was named as the receiver when the loan
/// was requested.
fn took_part(entry: &AuditEntry, actor: &Actor) -> bool {
    entry.actor_id() == actor.id()
        || matches!(
            entry.event(),
            LoanEvent::Requested { receiver_id, .. } if receiver_id == actor.id()
        )
}
