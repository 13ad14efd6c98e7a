use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{AssetId, Vehicle};
use crate::KernelError;

#[async_trait::async_trait]
pub trait VehicleQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &AssetId,
    ) -> error_stack::Result<Option<Vehicle>, KernelError>;
    async fn find_by_ids(
        &self,
        con: &mut Self::Transaction,
        ids: &[AssetId],
    ) -> error_stack::Result<Vec<Vehicle>, KernelError>;
}

pub trait DependOnVehicleQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type VehicleQuery: VehicleQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn vehicle_query(&self) -> &Self::VehicleQuery;
}
