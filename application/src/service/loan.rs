use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use error_stack::Report;

use kernel::interface::command::LoanCommand;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::lifecycle::{transition, Transition};
use kernel::interface::query::{
    DependOnLoanQuery, DependOnVehicleQuery, LoanQuery, VehicleQuery,
};
use kernel::interface::signature::DependOnAuditSigner;
use kernel::interface::update::{
    DependOnLoanEventModifier, DependOnLoanModifier, LoanEventModifier, LoanModifier,
};
use kernel::prelude::entity::{
    AssetId, AuditContext, DateRange, LoanId, LoanRecord, SelectLimit, SelectOffset, UserId,
};
use kernel::prelude::listing::{group, LoanBoard, LoanFilter, LoanTab, Registrations};
use kernel::KernelError;

use crate::transfer::{
    BulkLoanDto, GetBoardDto, GetLoanDto, LoanBoardDto, LoanChangeDto, LoanCommandDto,
};

/// Runs a lifecycle command against a stored record and persists the result
/// inside the caller's transaction.
#[async_trait::async_trait]
pub trait HandleLoanService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnLoanQuery
    + DependOnLoanModifier
    + DependOnLoanEventModifier
    + DependOnAuditSigner
{
    async fn handle_loan(
        &self,
        con: &mut <Self::DatabaseConnection as DatabaseConnection>::Transaction,
        id: &LoanId,
        command: LoanCommand,
        context: &AuditContext,
    ) -> error_stack::Result<Transition, KernelError> {
        let current = self.loan_query().find_by_id(con, id).await?;
        let outcome = transition(current, command, context, self.audit_signer())?;
        match (outcome.previous(), outcome.next()) {
            (None, Some(next)) => self.loan_modifier().create(con, next).await?,
            (Some(previous), Some(next)) => {
                self.loan_modifier()
                    .update(con, next, previous.version())
                    .await?
            }
            (Some(previous), None) => {
                self.loan_modifier()
                    .delete(con, previous.id(), previous.version())
                    .await?
            }
            (None, None) => {}
        }
        self.loan_event_modifier()
            .append(con, outcome.entry())
            .await?;
        tracing::debug!(
            "loan {} {} by {}",
            outcome.loan_id(),
            outcome.entry().action(),
            context.actor().id()
        );
        Ok(outcome)
    }
}

impl<T> HandleLoanService for T where
    T: DependOnDatabaseConnection
        + DependOnLoanQuery
        + DependOnLoanModifier
        + DependOnLoanEventModifier
        + DependOnAuditSigner
{
}

#[async_trait::async_trait]
pub trait GetLoanService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnLoanQuery + DependOnVehicleQuery
{
    async fn get_loan(&self, dto: GetLoanDto) -> error_stack::Result<Option<LoanRecord>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let record = self.loan_query().find_by_id(&mut con, &dto.id).await?;
        con.commit().await?;
        match record {
            Some(record) if !LoanFilter::visible_to(&dto.actor, &record) => {
                Err(Report::new(KernelError::Forbidden)
                    .attach_printable(format!("Loan {} belongs to other users", dto.id)))
            }
            record => Ok(record),
        }
    }

    async fn get_board(&self, dto: GetBoardDto) -> error_stack::Result<LoanBoardDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let tab = dto.filter.tab();
        let records = match tab {
            LoanTab::Active => self.loan_query().find_open(&mut con).await?,
            LoanTab::History => {
                let participant = (!dto.actor.is_manager()).then(|| dto.actor.id());
                collect_closed(self.loan_query(), &mut con, dto.filter.range(), participant)
                    .await?
            }
        };
        let registrations = self
            .vehicle_query()
            .find_by_ids(&mut con, &vehicle_ids(&records))
            .await?
            .into_iter()
            .map(|vehicle| (*vehicle.id(), vehicle.registration().clone()))
            .collect::<Registrations>();
        con.commit().await?;

        let mut visible = dto.filter.apply(&dto.actor, records, &registrations);
        if tab == LoanTab::History {
            visible.sort_by_key(|record| Reverse(LoanTab::History.time_of(record)));
            visible = page(visible, &dto.limit, &dto.offset);
        }
        let board = LoanBoard::classify(visible);
        Ok(LoanBoardDto {
            pending: group(board.pending, dto.group_by, tab),
            active: group(board.active, dto.group_by, tab),
            history: group(board.history, dto.group_by, tab),
        })
    }
}

impl<T> GetLoanService for T where
    T: DependOnDatabaseConnection + DependOnLoanQuery + DependOnVehicleQuery
{
}

#[async_trait::async_trait]
pub trait LoanTransitionService: 'static + Sync + Send + HandleLoanService {
    async fn confirm_loans(&self, dto: BulkLoanDto) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        self.bulk(dto, LoanCommand::Confirm).await
    }

    async fn reject_loans(&self, dto: BulkLoanDto) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        self.bulk(dto, LoanCommand::Reject).await
    }

    async fn cancel_loans(&self, dto: BulkLoanDto) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        self.bulk(dto, LoanCommand::Cancel).await
    }

    /// Applies `command` to every id or to none of them. Repeated ids are
    /// handled once.
    async fn bulk(
        &self,
        dto: BulkLoanDto,
        command: LoanCommand,
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        if dto.ids.is_empty() {
            return Err(Report::new(KernelError::Validation).attach_printable("No loans selected"));
        }
        let mut seen = HashSet::with_capacity(dto.ids.len());
        let ids = dto
            .ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect::<Vec<LoanId>>();
        let mut con = self.database_connection().transact().await?;
        let mut changed = Vec::with_capacity(ids.len());
        for id in &ids {
            let outcome = self
                .handle_loan(&mut con, id, command.clone(), &dto.context)
                .await?;
            if let Some(record) = outcome.into_destruct().next {
                changed.push(record);
            }
        }
        con.commit().await?;
        Ok(changed)
    }

    async fn apply_command(&self, dto: LoanCommandDto) -> error_stack::Result<LoanChangeDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let outcome = self
            .handle_loan(&mut con, &dto.id, dto.command, &dto.context)
            .await?;
        con.commit().await?;
        Ok(LoanChangeDto {
            id: dto.id,
            record: outcome.into_destruct().next,
        })
    }
}

impl<T> LoanTransitionService for T where T: HandleLoanService {}

/// Every closed record in `range`, walking the store page by page. A
/// `participant` narrows the rows to the loans that user takes part in.
pub(crate) async fn collect_closed<Q: LoanQuery>(
    query: &Q,
    con: &mut Q::Transaction,
    range: &DateRange,
    participant: Option<&UserId>,
) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
    let limit = SelectLimit::default();
    let mut records = Vec::new();
    loop {
        let offset = SelectOffset::new(records.len() as i64);
        let batch = query
            .find_closed(con, range, participant, &limit, &offset)
            .await?;
        let fetched = batch.len() as i64;
        records.extend(batch);
        if fetched < *limit.as_ref() {
            break;
        }
    }
    Ok(records)
}

fn page(records: Vec<LoanRecord>, limit: &SelectLimit, offset: &SelectOffset) -> Vec<LoanRecord> {
    let skip = usize::try_from(*offset.as_ref()).unwrap_or(0);
    let take = usize::try_from(*limit.as_ref()).unwrap_or(0);
    records.into_iter().skip(skip).take(take).collect()
}

pub(crate) fn vehicle_ids<'a>(records: impl IntoIterator<Item = &'a LoanRecord>) -> Vec<AssetId> {
    records
        .into_iter()
        .filter(|record| record.asset_kind().is_vehicle())
        .map(|record| *record.asset_id())
        .collect()
}

pub(crate) fn index_by_id(records: Vec<LoanRecord>) -> HashMap<LoanId, LoanRecord> {
    records
        .into_iter()
        .map(|record| (*record.id(), record))
        .collect()
}
