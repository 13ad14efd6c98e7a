use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::AssetQuery;
use kernel::prelude::entity::{Asset, AssetId, AssetKind, AssetLabel};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresAssetRepository;

#[async_trait::async_trait]
impl AssetQuery for PostgresAssetRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        kind: Option<&AssetKind>,
    ) -> error_stack::Result<Vec<Asset>, KernelError> {
        PgAssetInternal::find_all(con, kind).await
    }

    async fn find_by_ids(
        &self,
        con: &mut PostgresTransaction,
        ids: &[AssetId],
    ) -> error_stack::Result<Vec<Asset>, KernelError> {
        PgAssetInternal::find_by_ids(con, ids).await
    }
}

#[derive(sqlx::FromRow)]
struct AssetRow {
    id: Uuid,
    kind: String,
    label: String,
}

impl TryFrom<AssetRow> for Asset {
    type Error = Report<KernelError>;
    fn try_from(value: AssetRow) -> Result<Self, Self::Error> {
        Ok(Asset::new(
            AssetId::new(value.id),
            value.kind.parse()?,
            AssetLabel::new(value.label),
        ))
    }
}

pub(in crate::database) struct PgAssetInternal;

impl PgAssetInternal {
    async fn find_all(
        con: &mut PgConnection,
        kind: Option<&AssetKind>,
    ) -> error_stack::Result<Vec<Asset>, KernelError> {
        sqlx::query_as::<_, AssetRow>(
            // language=postgresql
            r#"
            SELECT id, kind, label
            FROM assets
            WHERE $1::text IS NULL OR kind = $1
            ORDER BY label
            "#,
        )
        .bind(kind.map(AssetKind::as_str))
        .fetch_all(con)
        .await
        .convert_error()?
        .into_iter()
        .map(Asset::try_from)
        .collect()
    }

    async fn find_by_ids(
        con: &mut PgConnection,
        ids: &[AssetId],
    ) -> error_stack::Result<Vec<Asset>, KernelError> {
        let ids = ids.iter().map(|id| *id.as_ref()).collect::<Vec<Uuid>>();
        sqlx::query_as::<_, AssetRow>(
            // language=postgresql
            r#"
            SELECT id, kind, label
            FROM assets
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(con)
        .await
        .convert_error()?
        .into_iter()
        .map(Asset::try_from)
        .collect()
    }

    #[cfg(test)]
    pub(in crate::database) async fn insert(
        con: &mut PgConnection,
        asset: &Asset,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO assets (id, kind, label)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(asset.id().as_ref())
        .bind(asset.kind().as_str())
        .bind(asset.label().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::AssetQuery;
    use kernel::prelude::entity::{Asset, AssetId, AssetKind, AssetLabel};
    use kernel::KernelError;

    use crate::database::postgres::asset::PgAssetInternal;
    use crate::database::postgres::{PostgresAssetRepository, PostgresDatabase};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let radio = Asset::new(
            AssetId::new(uuid::Uuid::new_v4()),
            AssetKind::Radio,
            AssetLabel::new("Radio #12"),
        );
        let vest = Asset::new(
            AssetId::new(uuid::Uuid::new_v4()),
            AssetKind::Vest,
            AssetLabel::new("Vest L"),
        );
        PgAssetInternal::insert(&mut con, &radio).await?;
        PgAssetInternal::insert(&mut con, &vest).await?;

        let found = PostgresAssetRepository
            .find_by_ids(&mut con, &[*radio.id(), *vest.id()])
            .await?;
        assert_eq!(found.len(), 2);

        let radios = PostgresAssetRepository
            .find_all(&mut con, Some(&AssetKind::Radio))
            .await?;
        assert!(radios.contains(&radio));
        assert!(!radios.contains(&vest));

        con.roll_back().await?;
        Ok(())
    }
}
