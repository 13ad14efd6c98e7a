use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use error_stack::Report;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::draft::{BatchDraftStore, DependOnBatchDraftStore};
use kernel::interface::event::AuditEntry;
use kernel::interface::query::{
    AssetQuery, DependOnAssetQuery, DependOnLoanEventQuery, DependOnLoanQuery,
    DependOnVehicleQuery, LoanEventQuery, LoanQuery, VehicleQuery,
};
use kernel::interface::signature::{AuditSigner, DependOnAuditSigner};
use kernel::interface::update::{
    DependOnLoanEventModifier, DependOnLoanModifier, DependOnVehicleModifier, LoanEventModifier,
    LoanModifier, VehicleModifier,
};
use kernel::prelude::entity::{
    Actor, ActorRole, Asset, AssetId, AssetKind, AssetLabel, AuditContext, BatchDraft, BatchId,
    CheckoutTime, DateRange, DraftId, EventVersion, Kilometers, LoanDescription, LoanId, LoanMeta,
    LoanRecord, LoanStatus, ReturnedAt, SelectLimit, SelectOffset, SignatureHash, UserId, UserName,
    Vehicle,
};
use kernel::prelude::listing::LoanTab;
use kernel::KernelError;

/// Everything the services read and write, kept in process.
#[derive(Debug, Clone, Default)]
pub(crate) struct Store {
    pub loans: HashMap<LoanId, LoanRecord>,
    pub events: Vec<AuditEntry>,
    pub assets: Vec<Asset>,
    pub vehicles: HashMap<AssetId, Vehicle>,
}

/// Transactions work on a copy of the store that replaces it on commit, so
/// dropping or rolling back leaves no trace.
#[derive(Clone, Default)]
pub(crate) struct MemoryDatabase(Arc<Mutex<Store>>);

impl MemoryDatabase {
    pub fn snapshot(&self) -> Store {
        self.0.lock().unwrap().clone()
    }

    pub fn seed(&self, f: impl FnOnce(&mut Store)) {
        f(&mut self.0.lock().unwrap())
    }
}

pub(crate) struct MemoryTransaction {
    shared: Arc<Mutex<Store>>,
    work: Store,
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        *self.shared.lock().unwrap() = self.work;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;

    async fn transact(&self) -> error_stack::Result<MemoryTransaction, KernelError> {
        let work = self.snapshot();
        Ok(MemoryTransaction {
            shared: Arc::clone(&self.0),
            work,
        })
    }
}

pub(crate) struct MemoryRepository;

#[async_trait::async_trait]
impl LoanQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &LoanId,
    ) -> error_stack::Result<Option<LoanRecord>, KernelError> {
        Ok(con.work.loans.get(id).cloned())
    }

    async fn find_by_ids(
        &self,
        con: &mut MemoryTransaction,
        ids: &[LoanId],
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        Ok(ids
            .iter()
            .filter_map(|id| con.work.loans.get(id).cloned())
            .collect())
    }

    async fn find_open(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        let mut open = con
            .work
            .loans
            .values()
            .filter(|record| record.status().is_open())
            .cloned()
            .collect::<Vec<_>>();
        open.sort_by_key(|record| Reverse(LoanTab::Active.time_of(record)));
        Ok(open)
    }

    async fn find_closed(
        &self,
        con: &mut MemoryTransaction,
        range: &DateRange,
        participant: Option<&UserId>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<LoanRecord>, KernelError> {
        let mut closed = con
            .work
            .loans
            .values()
            .filter(|record| !record.status().is_open())
            .filter(|record| range.contains(LoanTab::History.time_of(record)))
            .filter(|record| participant.map_or(true, |user| record.involves(user)))
            .cloned()
            .collect::<Vec<_>>();
        closed.sort_by_key(|record| {
            (
                Reverse(LoanTab::History.time_of(record)),
                *AsRef::<Uuid>::as_ref(record.id()),
            )
        });
        Ok(closed
            .into_iter()
            .skip(*offset.as_ref() as usize)
            .take(*limit.as_ref() as usize)
            .collect())
    }
}

fn stale(id: &LoanId) -> Report<KernelError> {
    Report::new(KernelError::Concurrency).attach_printable(format!("Loan {id} changed meanwhile"))
}

#[async_trait::async_trait]
impl LoanModifier for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        loan: &LoanRecord,
    ) -> error_stack::Result<(), KernelError> {
        let taken = con
            .work
            .loans
            .values()
            .any(|record| record.asset_id() == loan.asset_id() && record.status().is_open());
        if taken {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("Asset {} is already on loan", loan.asset_id())));
        }
        con.work.loans.insert(*loan.id(), loan.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        loan: &LoanRecord,
        expected: &EventVersion<LoanRecord>,
    ) -> error_stack::Result<(), KernelError> {
        match con.work.loans.get_mut(loan.id()) {
            Some(stored) if stored.version() == expected => {
                *stored = loan.clone();
                Ok(())
            }
            _ => Err(stale(loan.id())),
        }
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        loan_id: &LoanId,
        expected: &EventVersion<LoanRecord>,
    ) -> error_stack::Result<(), KernelError> {
        match con.work.loans.get(loan_id) {
            Some(stored) if stored.version() == expected => {
                con.work.loans.remove(loan_id);
                Ok(())
            }
            _ => Err(stale(loan_id)),
        }
    }
}

#[async_trait::async_trait]
impl LoanEventQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn get_events(
        &self,
        con: &mut MemoryTransaction,
        id: &LoanId,
    ) -> error_stack::Result<Vec<AuditEntry>, KernelError> {
        Ok(con
            .work
            .events
            .iter()
            .filter(|entry| entry.loan_id() == id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl LoanEventModifier for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn append(
        &self,
        con: &mut MemoryTransaction,
        entry: &AuditEntry,
    ) -> error_stack::Result<(), KernelError> {
        con.work.events.push(entry.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl AssetQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
        kind: Option<&AssetKind>,
    ) -> error_stack::Result<Vec<Asset>, KernelError> {
        Ok(con
            .work
            .assets
            .iter()
            .filter(|asset| kind.map_or(true, |kind| asset.kind() == kind))
            .cloned()
            .collect())
    }

    async fn find_by_ids(
        &self,
        con: &mut MemoryTransaction,
        ids: &[AssetId],
    ) -> error_stack::Result<Vec<Asset>, KernelError> {
        Ok(con
            .work
            .assets
            .iter()
            .filter(|asset| ids.contains(asset.id()))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl VehicleQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &AssetId,
    ) -> error_stack::Result<Option<Vehicle>, KernelError> {
        Ok(con.work.vehicles.get(id).cloned())
    }

    async fn find_by_ids(
        &self,
        con: &mut MemoryTransaction,
        ids: &[AssetId],
    ) -> error_stack::Result<Vec<Vehicle>, KernelError> {
        Ok(ids
            .iter()
            .filter_map(|id| con.work.vehicles.get(id).cloned())
            .collect())
    }
}

#[async_trait::async_trait]
impl VehicleModifier for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn update_km(
        &self,
        con: &mut MemoryTransaction,
        id: &AssetId,
        km: &Kilometers,
    ) -> error_stack::Result<(), KernelError> {
        let Some(vehicle) = con.work.vehicles.get_mut(id) else {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Vehicle {id} does not exist")));
        };
        *vehicle = Vehicle::new(*vehicle.id(), vehicle.registration().clone(), *km);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryDrafts(Mutex<HashMap<DraftId, BatchDraft>>);

impl MemoryDrafts {
    pub fn contains(&self, id: &DraftId) -> bool {
        self.0.lock().unwrap().contains_key(id)
    }
}

#[async_trait::async_trait]
impl BatchDraftStore for MemoryDrafts {
    async fn find(&self, id: &DraftId) -> error_stack::Result<Option<BatchDraft>, KernelError> {
        Ok(self.0.lock().unwrap().get(id).cloned())
    }

    async fn save(&self, draft: &BatchDraft) -> error_stack::Result<(), KernelError> {
        self.0.lock().unwrap().insert(*draft.id(), draft.clone());
        Ok(())
    }

    async fn remove(&self, id: &DraftId) -> error_stack::Result<(), KernelError> {
        self.0.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Uses the payload itself as the signature.
pub(crate) struct EchoSigner;

impl AuditSigner for EchoSigner {
    fn sign(&self, payload: &[u8]) -> SignatureHash {
        SignatureHash::new(String::from_utf8_lossy(payload))
    }

    fn verify(&self, payload: &[u8], signature: &SignatureHash) -> bool {
        &self.sign(payload) == signature
    }
}

#[derive(Default)]
pub(crate) struct MemoryModule {
    pub db: MemoryDatabase,
    pub drafts: MemoryDrafts,
}

impl DependOnDatabaseConnection for MemoryModule {
    type DatabaseConnection = MemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.db
    }
}

impl DependOnLoanQuery for MemoryModule {
    type LoanQuery = MemoryRepository;
    fn loan_query(&self) -> &Self::LoanQuery {
        &MemoryRepository
    }
}

impl DependOnLoanModifier for MemoryModule {
    type LoanModifier = MemoryRepository;
    fn loan_modifier(&self) -> &Self::LoanModifier {
        &MemoryRepository
    }
}

impl DependOnLoanEventQuery for MemoryModule {
    type LoanEventQuery = MemoryRepository;
    fn loan_event_query(&self) -> &Self::LoanEventQuery {
        &MemoryRepository
    }
}

impl DependOnLoanEventModifier for MemoryModule {
    type LoanEventModifier = MemoryRepository;
    fn loan_event_modifier(&self) -> &Self::LoanEventModifier {
        &MemoryRepository
    }
}

impl DependOnAssetQuery for MemoryModule {
    type AssetQuery = MemoryRepository;
    fn asset_query(&self) -> &Self::AssetQuery {
        &MemoryRepository
    }
}

impl DependOnVehicleQuery for MemoryModule {
    type VehicleQuery = MemoryRepository;
    fn vehicle_query(&self) -> &Self::VehicleQuery {
        &MemoryRepository
    }
}

impl DependOnVehicleModifier for MemoryModule {
    type VehicleModifier = MemoryRepository;
    fn vehicle_modifier(&self) -> &Self::VehicleModifier {
        &MemoryRepository
    }
}

impl DependOnBatchDraftStore for MemoryModule {
    type BatchDraftStore = MemoryDrafts;
    fn batch_draft_store(&self) -> &Self::BatchDraftStore {
        &self.drafts
    }
}

impl DependOnAuditSigner for MemoryModule {
    type AuditSigner = EchoSigner;
    fn audit_signer(&self) -> &Self::AuditSigner {
        &EchoSigner
    }
}

pub(crate) fn member(name: &str) -> Actor {
    Actor::new(UserId::new(Uuid::new_v4()), UserName::new(name), ActorRole::Member)
}

pub(crate) fn manager(name: &str) -> Actor {
    Actor::new(UserId::new(Uuid::new_v4()), UserName::new(name), ActorRole::Manager)
}

pub(crate) fn context(actor: &Actor) -> AuditContext {
    AuditContext::new(actor.clone(), None, OffsetDateTime::now_utc())
}

pub(crate) fn asset(kind: AssetKind, label: &str) -> Asset {
    Asset::new(AssetId::new(Uuid::new_v4()), kind, AssetLabel::new(label))
}

/// A returned radio loan between `operator` and `receiver`, closed
/// `minutes_ago` minutes back.
pub(crate) fn completed(operator: &Actor, receiver: &Actor, minutes_ago: i64) -> LoanRecord {
    let returned = OffsetDateTime::now_utc() - Duration::minutes(minutes_ago);
    LoanRecord::new(
        LoanId::new(Uuid::new_v4()),
        BatchId::new(Uuid::new_v4()),
        *operator.id(),
        *receiver.id(),
        receiver.name().clone(),
        AssetKind::Radio,
        AssetId::new(Uuid::new_v4()),
        LoanDescription::new(format!("Radio for {}", receiver.name())),
        CheckoutTime::new(returned - Duration::hours(8)),
        Some(ReturnedAt::new(returned)),
        LoanStatus::Completed,
        LoanMeta::default(),
        None,
        None,
        SignatureHash::default(),
        EventVersion::new(2),
    )
}

/// A radio handed from `operator` to `receiver` that still awaits confirmation.
pub(crate) fn pending(operator: &Actor, receiver: &Actor) -> LoanRecord {
    LoanRecord::new(
        LoanId::new(Uuid::new_v4()),
        BatchId::new(Uuid::new_v4()),
        *operator.id(),
        *receiver.id(),
        receiver.name().clone(),
        AssetKind::Radio,
        AssetId::new(Uuid::new_v4()),
        LoanDescription::new("Radio #2"),
        CheckoutTime::new(OffsetDateTime::now_utc()),
        None,
        LoanStatus::Pending,
        LoanMeta::default(),
        None,
        None,
        SignatureHash::default(),
        EventVersion::new(0),
    )
}
