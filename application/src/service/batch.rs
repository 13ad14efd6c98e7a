use std::collections::HashMap;

use error_stack::Report;
use uuid::Uuid;

use kernel::interface::command::LoanCommand;
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::draft::{BatchDraftStore, DependOnBatchDraftStore};
use kernel::interface::query::{
    AssetQuery, DependOnAssetQuery, DependOnVehicleQuery, LoanQuery, VehicleQuery,
};
use kernel::interface::update::{DependOnVehicleModifier, VehicleModifier};
use kernel::prelude::entity::{
    Actor, AssetId, BatchDraft, BatchId, DraftId, DraftItem, DraftKind, LoanDescription, LoanId,
    LoanStatus, Vehicle,
};
use kernel::prelude::listing::available_assets;
use kernel::KernelError;

use crate::service::{index_by_id, HandleLoanService};
use crate::transfer::{
    CommitDraftDto, CommittedBatchDto, DraftDto, StartCheckoutDto, StartReturnDto,
    SubmitReadingDto,
};

/// Checkouts and returns that collect one mileage reading per vehicle before
/// they are written as loans.
#[async_trait::async_trait]
pub trait BatchDraftService:
    'static
    + Sync
    + Send
    + HandleLoanService
    + DependOnBatchDraftStore
    + DependOnAssetQuery
    + DependOnVehicleQuery
    + DependOnVehicleModifier
{
    async fn start_checkout(&self, dto: StartCheckoutDto) -> error_stack::Result<BatchDraft, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let assets = self
            .asset_query()
            .find_by_ids(&mut con, &dto.asset_ids)
            .await?;
        if let Some(missing) = dto
            .asset_ids
            .iter()
            .find(|id| !assets.iter().any(|asset| asset.id() == *id))
        {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Asset {missing} does not exist")));
        }
        let open = self.loan_query().find_open(&mut con).await?;
        let available = available_assets(assets.clone(), open.iter(), None);
        if let Some(taken) = assets.iter().find(|asset| !available.contains(asset)) {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("{} is already on loan", taken.label().as_ref())));
        }
        let vehicle_ids = assets
            .iter()
            .filter(|asset| asset.kind().is_vehicle())
            .map(|asset| *asset.id())
            .collect::<Vec<AssetId>>();
        let vehicles = self
            .vehicle_query()
            .find_by_ids(&mut con, &vehicle_ids)
            .await?
            .into_iter()
            .map(|vehicle| (*vehicle.id(), vehicle))
            .collect::<HashMap<AssetId, Vehicle>>();
        con.commit().await?;

        let mut items = Vec::with_capacity(dto.asset_ids.len());
        for id in &dto.asset_ids {
            let Some(asset) = available.iter().find(|asset| asset.id() == id) else {
                continue;
            };
            let current_km = if asset.kind().is_vehicle() {
                let vehicle = vehicles.get(id).ok_or_else(|| {
                    Report::new(KernelError::NotFound)
                        .attach_printable(format!("Vehicle details for {id} are missing"))
                })?;
                Some(*vehicle.current_km())
            } else {
                None
            };
            items.push(DraftItem::checkout(
                *id,
                *asset.kind(),
                LoanDescription::new(asset.label().as_ref().clone()),
                current_km,
            ));
        }
        let draft = BatchDraft::checkout(
            DraftId::new(Uuid::new_v4()),
            *dto.context.actor().id(),
            dto.receiver_id,
            dto.receiver_name,
            items,
            *dto.context.at(),
        )?;
        self.batch_draft_store().save(&draft).await?;
        Ok(draft)
    }

    async fn start_return(&self, dto: StartReturnDto) -> error_stack::Result<BatchDraft, KernelError> {
        let actor = dto.context.actor();
        let mut con = self.database_connection().transact().await?;
        let loans = index_by_id(
            self.loan_query()
                .find_by_ids(&mut con, &dto.loan_ids)
                .await?,
        );
        con.commit().await?;

        let mut items = Vec::with_capacity(dto.loan_ids.len());
        for id in &dto.loan_ids {
            let loan = loans.get(id).ok_or_else(|| {
                Report::new(KernelError::NotFound).attach_printable(format!("Loan {id} does not exist"))
            })?;
            if loan.status() != &LoanStatus::Active {
                return Err(Report::new(KernelError::InvalidTransition)
                    .attach_printable(format!("Loan {id} is {}", loan.status())));
            }
            if !(actor.is_or_manages(loan.operator_id()) || actor.is_or_manages(loan.receiver_id())) {
                return Err(Report::new(KernelError::Forbidden)
                    .attach_printable(format!("Loan {id} belongs to other users")));
            }
            items.push(DraftItem::returning(
                *loan.id(),
                *loan.asset_id(),
                *loan.asset_kind(),
                loan.description().clone(),
                loan.meta().km_start,
            ));
        }
        let draft = BatchDraft::returning(
            DraftId::new(Uuid::new_v4()),
            *actor.id(),
            items,
            *dto.context.at(),
        )?;
        self.batch_draft_store().save(&draft).await?;
        Ok(draft)
    }

    async fn get_draft(&self, dto: DraftDto) -> error_stack::Result<BatchDraft, KernelError> {
        self.load_draft(&dto.id, &dto.actor).await
    }

    async fn submit_reading(&self, dto: SubmitReadingDto) -> error_stack::Result<BatchDraft, KernelError> {
        let mut draft = self.load_draft(&dto.id, &dto.actor).await?;
        draft.submit(dto.reading)?;
        self.batch_draft_store().save(&draft).await?;
        Ok(draft)
    }

    async fn commit_draft(&self, dto: CommitDraftDto) -> error_stack::Result<CommittedBatchDto, KernelError> {
        let draft = self.load_draft(&dto.id, dto.context.actor()).await?;
        if let Some(prompt) = draft.next_prompt() {
            return Err(Report::new(KernelError::InvalidTransition).attach_printable(format!(
                "{} vehicle(s) still need mileage, next is '{}'",
                prompt.remaining(),
                prompt.description()
            )));
        }

        let mut con = self.database_connection().transact().await?;
        let mut loans = Vec::with_capacity(draft.items().len());
        let batch_id = match draft.kind() {
            DraftKind::Checkout => {
                let (Some(receiver_id), Some(receiver_name)) =
                    (draft.receiver_id(), draft.receiver_name())
                else {
                    return Err(Report::new(KernelError::Internal)
                        .attach_printable("Checkout draft has no receiver"));
                };
                let batch_id = BatchId::new(Uuid::new_v4());
                for item in draft.items() {
                    let reading = draft.reading_for(item.asset_id());
                    let id = LoanId::new(Uuid::new_v4());
                    let command = LoanCommand::Request {
                        id,
                        batch_id,
                        receiver_id: *receiver_id,
                        receiver_name: receiver_name.clone(),
                        asset_kind: *item.asset_kind(),
                        asset_id: *item.asset_id(),
                        description: item.description().clone(),
                        km_start: reading.map(|reading| *reading.km()),
                        driver: reading.and_then(|reading| reading.driver().clone()),
                    };
                    let outcome = self
                        .handle_loan(&mut con, &id, command, &dto.context)
                        .await?;
                    loans.extend(outcome.into_destruct().next);
                }
                Some(batch_id)
            }
            DraftKind::Return => {
                for item in draft.items() {
                    let Some(id) = item.loan_id() else {
                        return Err(Report::new(KernelError::Internal)
                            .attach_printable("Return draft item has no loan"));
                    };
                    let reading = draft.reading_for(item.asset_id());
                    let command = LoanCommand::Return {
                        km_end: reading.map(|reading| *reading.km()),
                        fuel: reading.and_then(|reading| reading.fuel().clone()),
                    };
                    let outcome = self
                        .handle_loan(&mut con, id, command, &dto.context)
                        .await?;
                    if let Some(reading) = reading {
                        self.vehicle_modifier()
                            .update_km(&mut con, item.asset_id(), reading.km())
                            .await?;
                    }
                    loans.extend(outcome.into_destruct().next);
                }
                None
            }
        };
        con.commit().await?;
        self.batch_draft_store().remove(draft.id()).await?;
        tracing::info!("committed draft {} with {} loan(s)", draft.id(), loans.len());
        Ok(CommittedBatchDto { batch_id, loans })
    }

    async fn discard_draft(&self, dto: DraftDto) -> error_stack::Result<(), KernelError> {
        let draft = self.load_draft(&dto.id, &dto.actor).await?;
        self.batch_draft_store().remove(draft.id()).await
    }

    async fn load_draft(&self, id: &DraftId, actor: &Actor) -> error_stack::Result<BatchDraft, KernelError> {
        let draft = self
            .batch_draft_store()
            .find(id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("Draft {id} does not exist or expired"))
            })?;
        if !actor.is_or_manages(draft.operator_id()) {
            return Err(Report::new(KernelError::Forbidden)
                .attach_printable(format!("Draft {id} belongs to another operator")));
        }
        Ok(draft)
    }
}

impl<T> BatchDraftService for T where
    T: HandleLoanService
        + DependOnBatchDraftStore
        + DependOnAssetQuery
        + DependOnVehicleQuery
        + DependOnVehicleModifier
{
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{
        Actor, Asset, AssetKind, Kilometers, LoanStatus, MileageReading, RegistrationNumber,
        Vehicle,
    };
    use kernel::KernelError;

    use crate::service::memory::{asset, context, member, MemoryModule};
    use crate::service::{BatchDraftService, LoanTransitionService};
    use crate::transfer::{
        BulkLoanDto, CommitDraftDto, StartCheckoutDto, StartReturnDto, SubmitReadingDto,
    };

    struct Garage {
        module: MemoryModule,
        car: Asset,
        radio: Asset,
    }

    fn garage() -> Garage {
        let module = MemoryModule::default();
        let car = asset(AssetKind::Vehicle, "Octavia 1AB 2345");
        let radio = asset(AssetKind::Radio, "Radio #4");
        module.db.seed(|store| {
            store.assets = vec![car.clone(), radio.clone()];
            let registration = RegistrationNumber::new("1AB 2345");
            store.vehicles.insert(
                *car.id(),
                Vehicle::new(*car.id(), registration, Kilometers::new(1000)),
            );
        });
        Garage { module, car, radio }
    }

    fn checkout_dto(garage: &Garage, operator: &Actor) -> StartCheckoutDto {
        let receiver = member("Jane");
        StartCheckoutDto {
            context: context(operator),
            receiver_id: *receiver.id(),
            receiver_name: receiver.name().clone(),
            asset_ids: vec![*garage.car.id(), *garage.radio.id()],
        }
    }

    #[tokio::test]
    async fn commit_waits_for_outstanding_mileage() -> error_stack::Result<(), KernelError> {
        let garage = garage();
        let operator = member("Operator");
        let draft = garage
            .module
            .start_checkout(checkout_dto(&garage, &operator))
            .await?;

        let error = garage
            .module
            .commit_draft(CommitDraftDto {
                id: *draft.id(),
                context: context(&operator),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidTransition);
        assert!(garage.module.db.snapshot().loans.is_empty());
        assert!(garage.module.drafts.contains(draft.id()));
        Ok(())
    }

    #[tokio::test]
    async fn checkout_commit_shares_one_batch() -> error_stack::Result<(), KernelError> {
        let garage = garage();
        let operator = member("Operator");
        let draft = garage
            .module
            .start_checkout(checkout_dto(&garage, &operator))
            .await?;
        garage
            .module
            .submit_reading(SubmitReadingDto {
                id: *draft.id(),
                actor: operator.clone(),
                reading: MileageReading::new(
                    *garage.car.id(),
                    Kilometers::new(1010),
                    None,
                    Some("Jane".to_string()),
                ),
            })
            .await?;

        let committed = garage
            .module
            .commit_draft(CommitDraftDto {
                id: *draft.id(),
                context: context(&operator),
            })
            .await?;
        let batch_id = committed.batch_id.unwrap();
        assert_eq!(committed.loans.len(), 2);
        assert!(committed
            .loans
            .iter()
            .all(|loan| loan.status() == &LoanStatus::Pending && loan.batch_id() == &batch_id));
        let car_loan = committed
            .loans
            .iter()
            .find(|loan| loan.asset_id() == garage.car.id())
            .unwrap();
        assert_eq!(car_loan.meta().km_start, Some(Kilometers::new(1010)));
        assert_eq!(car_loan.meta().driver.as_deref(), Some("Jane"));

        let store = garage.module.db.snapshot();
        assert_eq!(store.loans.len(), 2);
        assert_eq!(store.events.len(), 2);
        assert!(!garage.module.drafts.contains(draft.id()));
        Ok(())
    }

    #[tokio::test]
    async fn loaned_asset_conflicts() -> error_stack::Result<(), KernelError> {
        let garage = garage();
        let operator = member("Operator");
        let draft = garage
            .module
            .start_checkout(StartCheckoutDto {
                asset_ids: vec![*garage.radio.id()],
                ..checkout_dto(&garage, &operator)
            })
            .await?;
        garage
            .module
            .commit_draft(CommitDraftDto {
                id: *draft.id(),
                context: context(&operator),
            })
            .await?;

        let error = garage
            .module
            .start_checkout(checkout_dto(&garage, &operator))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Conflict);
        Ok(())
    }

    #[tokio::test]
    async fn return_commit_records_mileage() -> error_stack::Result<(), KernelError> {
        let garage = garage();
        let operator = member("Operator");
        let receiver = member("Jane");
        let draft = garage
            .module
            .start_checkout(StartCheckoutDto {
                receiver_id: *receiver.id(),
                receiver_name: receiver.name().clone(),
                ..checkout_dto(&garage, &operator)
            })
            .await?;
        garage
            .module
            .submit_reading(SubmitReadingDto {
                id: *draft.id(),
                actor: operator.clone(),
                reading: MileageReading::new(*garage.car.id(), Kilometers::new(1000), None, None),
            })
            .await?;
        let committed = garage
            .module
            .commit_draft(CommitDraftDto {
                id: *draft.id(),
                context: context(&operator),
            })
            .await?;
        let loan_ids = committed.loans.iter().map(|loan| *loan.id()).collect::<Vec<_>>();
        garage
            .module
            .confirm_loans(BulkLoanDto {
                ids: loan_ids.clone(),
                context: context(&receiver),
            })
            .await?;

        let draft = garage
            .module
            .start_return(StartReturnDto {
                context: context(&operator),
                loan_ids: loan_ids.clone(),
            })
            .await?;
        garage
            .module
            .submit_reading(SubmitReadingDto {
                id: *draft.id(),
                actor: operator.clone(),
                reading: MileageReading::new(*garage.car.id(), Kilometers::new(1250), None, None),
            })
            .await?;
        let returned = garage
            .module
            .commit_draft(CommitDraftDto {
                id: *draft.id(),
                context: context(&operator),
            })
            .await?;

        assert_eq!(returned.batch_id, None);
        assert!(returned
            .loans
            .iter()
            .all(|loan| loan.status() == &LoanStatus::Completed && loan.return_time().is_some()));
        let store = garage.module.db.snapshot();
        assert_eq!(
            store.vehicles.get(garage.car.id()).map(|car| *car.current_km()),
            Some(Kilometers::new(1250))
        );
        let car_loan = &store.loans[&loan_ids[0]];
        let car_loan = if car_loan.asset_id() == garage.car.id() {
            car_loan
        } else {
            &store.loans[&loan_ids[1]]
        };
        assert_eq!(car_loan.meta().km_end, Some(Kilometers::new(1250)));
        Ok(())
    }
}
