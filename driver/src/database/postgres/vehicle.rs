use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::VehicleQuery;
use kernel::interface::update::VehicleModifier;
use kernel::prelude::entity::{AssetId, Kilometers, RegistrationNumber, Vehicle};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresVehicleRepository;

#[async_trait::async_trait]
impl VehicleQuery for PostgresVehicleRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &AssetId,
    ) -> error_stack::Result<Option<Vehicle>, KernelError> {
        PgVehicleInternal::find_by_id(con, id).await
    }

    async fn find_by_ids(
        &self,
        con: &mut PostgresTransaction,
        ids: &[AssetId],
    ) -> error_stack::Result<Vec<Vehicle>, KernelError> {
        PgVehicleInternal::find_by_ids(con, ids).await
    }
}

#[async_trait::async_trait]
impl VehicleModifier for PostgresVehicleRepository {
    type Transaction = PostgresTransaction;

    async fn update_km(
        &self,
        con: &mut PostgresTransaction,
        id: &AssetId,
        km: &Kilometers,
    ) -> error_stack::Result<(), KernelError> {
        PgVehicleInternal::update_km(con, id, km).await
    }
}

#[derive(sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    registration_number: String,
    current_km: i64,
}

impl From<VehicleRow> for Vehicle {
    fn from(value: VehicleRow) -> Self {
        Vehicle::new(
            AssetId::new(value.id),
            RegistrationNumber::new(value.registration_number),
            Kilometers::new(value.current_km),
        )
    }
}

pub(in crate::database) struct PgVehicleInternal;

impl PgVehicleInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &AssetId,
    ) -> error_stack::Result<Option<Vehicle>, KernelError> {
        let row = sqlx::query_as::<_, VehicleRow>(
            // language=postgresql
            r#"
            SELECT id, registration_number, current_km
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Vehicle::from))
    }

    async fn find_by_ids(
        con: &mut PgConnection,
        ids: &[AssetId],
    ) -> error_stack::Result<Vec<Vehicle>, KernelError> {
        let ids = ids.iter().map(|id| *id.as_ref()).collect::<Vec<Uuid>>();
        let rows = sqlx::query_as::<_, VehicleRow>(
            // language=postgresql
            r#"
            SELECT id, registration_number, current_km
            FROM vehicles
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Vehicle::from).collect())
    }

    /// Writes both mileage columns so readers of either stay in sync.
    async fn update_km(
        con: &mut PgConnection,
        id: &AssetId,
        km: &Kilometers,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE vehicles
            SET current_km = $2, "currentKm" = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .bind(km.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Vehicle {id} does not exist")));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(in crate::database) async fn insert(
        con: &mut PgConnection,
        vehicle: &Vehicle,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO vehicles (id, registration_number, current_km, "currentKm")
            VALUES ($1, $2, $3, $3)
            "#,
        )
        .bind(vehicle.id().as_ref())
        .bind(vehicle.registration().as_ref())
        .bind(vehicle.current_km().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
