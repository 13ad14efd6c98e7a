use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{EventVersion, LoanId, LoanRecord};
use crate::event::AuditEntry;
use crate::KernelError;

#[async_trait::async_trait]
pub trait LoanModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Fails with `Conflict` when the asset already has an open loan.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        loan: &LoanRecord,
    ) -> error_stack::Result<(), KernelError>;
    /// Writes `loan` only if the stored version still equals `expected`,
    /// otherwise fails with `Concurrency`.
    async fn update(
        &self,
        con: &mut Self::Transaction,
        loan: &LoanRecord,
        expected: &EventVersion<LoanRecord>,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        loan_id: &LoanId,
        expected: &EventVersion<LoanRecord>,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnLoanModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanModifier: LoanModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_modifier(&self) -> &Self::LoanModifier;
}

#[async_trait::async_trait]
pub trait LoanEventModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn append(
        &self,
        con: &mut Self::Transaction,
        entry: &AuditEntry,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnLoanEventModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanEventModifier: LoanEventModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_event_modifier(&self) -> &Self::LoanEventModifier;
}
