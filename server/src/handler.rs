use std::ops::Deref;
use std::sync::Arc;

use driver::database::{
    PostgresAssetRepository, PostgresDatabase, PostgresLoanEventRepository,
    PostgresLoanRepository, PostgresVehicleRepository, RedisDatabase, RedisDraftRepository,
};
use driver::signature::Blake3AuditSigner;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::draft::DependOnBatchDraftStore;
use kernel::interface::query::{
    DependOnAssetQuery, DependOnLoanEventQuery, DependOnLoanQuery, DependOnVehicleQuery,
};
use kernel::interface::signature::DependOnAuditSigner;
use kernel::interface::update::{
    DependOnLoanEventModifier, DependOnLoanModifier, DependOnVehicleModifier,
};
use kernel::KernelError;
use vodca::References;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    pgpool: PostgresDatabase,
    drafts: RedisDraftRepository,
    signer: Blake3AuditSigner,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        pgpool.migrate().await?;
        let drafts = RedisDraftRepository::from_env(RedisDatabase::new()?)?;
        let signer = Blake3AuditSigner::from_env()?;

        Ok(Self {
            pgpool,
            drafts,
            signer,
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnLoanQuery for Handler {
    type LoanQuery = PostgresLoanRepository;
    fn loan_query(&self) -> &Self::LoanQuery {
        &PostgresLoanRepository
    }
}

impl DependOnLoanModifier for Handler {
    type LoanModifier = PostgresLoanRepository;
    fn loan_modifier(&self) -> &Self::LoanModifier {
        &PostgresLoanRepository
    }
}

impl DependOnLoanEventQuery for Handler {
    type LoanEventQuery = PostgresLoanEventRepository;
    fn loan_event_query(&self) -> &Self::LoanEventQuery {
        &PostgresLoanEventRepository
    }
}

impl DependOnLoanEventModifier for Handler {
    type LoanEventModifier = PostgresLoanEventRepository;
    fn loan_event_modifier(&self) -> &Self::LoanEventModifier {
        &PostgresLoanEventRepository
    }
}

impl DependOnAssetQuery for Handler {
    type AssetQuery = PostgresAssetRepository;
    fn asset_query(&self) -> &Self::AssetQuery {
        &PostgresAssetRepository
    }
}

impl DependOnVehicleQuery for Handler {
    type VehicleQuery = PostgresVehicleRepository;
    fn vehicle_query(&self) -> &Self::VehicleQuery {
        &PostgresVehicleRepository
    }
}

impl DependOnVehicleModifier for Handler {
    type VehicleModifier = PostgresVehicleRepository;
    fn vehicle_modifier(&self) -> &Self::VehicleModifier {
        &PostgresVehicleRepository
    }
}

impl DependOnBatchDraftStore for Handler {
    type BatchDraftStore = RedisDraftRepository;
    fn batch_draft_store(&self) -> &Self::BatchDraftStore {
        &self.drafts
    }
}

impl DependOnAuditSigner for Handler {
    type AuditSigner = Blake3AuditSigner;
    fn audit_signer(&self) -> &Self::AuditSigner {
        &self.signer
    }
}
