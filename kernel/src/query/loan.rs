use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{DateRange, LoanId, LoanRecord, SelectLimit, SelectOffset, UserId};
use crate::event::AuditEntry;
use crate::KernelError;

#[async_trait::async_trait]
pub trait LoanQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &LoanId,
    ) -> error_stack::Result<Option<LoanRecord>, KernelError>;
    async fn find_by_ids(
        &self,
        con: &mut Self::Transaction,
        ids: &[LoanId],
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError>;
    /// Pending and active records, newest checkout first.
    async fn find_open(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError>;
    /// Completed and rejected records whose return time falls in `range`,
    /// newest first. With a `participant` only records involving that user
    /// are returned.
    async fn find_closed(
        &self,
        con: &mut Self::Transaction,
        range: &DateRange,
        participant: Option<&UserId>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError>;
}

pub trait DependOnLoanQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanQuery: LoanQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_query(&self) -> &Self::LoanQuery;
}

#[async_trait::async_trait]
pub trait LoanEventQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Audit entries of one loan in version order.
    async fn get_events(
        &self,
        con: &mut Self::Transaction,
        id: &LoanId,
    ) -> error_stack::Result<Vec<AuditEntry>, KernelError>;
}

pub trait DependOnLoanEventQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanEventQuery: LoanEventQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_event_query(&self) -> &Self::LoanEventQuery;
}
