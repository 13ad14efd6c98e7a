use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{AssetId, Kilometers};
use crate::KernelError;

#[async_trait::async_trait]
pub trait VehicleModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn update_km(
        &self,
        con: &mut Self::Transaction,
        id: &AssetId,
        km: &Kilometers,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnVehicleModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type VehicleModifier: VehicleModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn vehicle_modifier(&self) -> &Self::VehicleModifier;
}
