use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Asset, AssetId, AssetKind};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AssetQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        kind: Option<&AssetKind>,
    ) -> error_stack::Result<Vec<Asset>, KernelError>;
    async fn find_by_ids(
        &self,
        con: &mut Self::Transaction,
        ids: &[AssetId],
    ) -> error_stack::Result<Vec<Asset>, KernelError>;
}

pub trait DependOnAssetQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type AssetQuery: AssetQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn asset_query(&self) -> &Self::AssetQuery;
}
