use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{AssetQuery, DependOnAssetQuery, DependOnLoanQuery, LoanQuery};
use kernel::prelude::entity::Asset;
use kernel::prelude::listing::available_assets;
use kernel::KernelError;

use crate::transfer::GetAvailableAssetDto;

#[async_trait::async_trait]
pub trait AvailableAssetService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnAssetQuery + DependOnLoanQuery
{
    async fn available_assets(
        &self,
        dto: GetAvailableAssetDto,
    ) -> error_stack::Result<Vec<Asset>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let assets = self
            .asset_query()
            .find_all(&mut con, dto.kind.as_ref())
            .await?;
        let open = self.loan_query().find_open(&mut con).await?;
        con.commit().await?;
        Ok(available_assets(assets, open.iter(), dto.kind))
    }
}

impl<T> AvailableAssetService for T where
    T: DependOnDatabaseConnection + DependOnAssetQuery + DependOnLoanQuery
{
}
