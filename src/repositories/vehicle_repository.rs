use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common_dto::resolve_sort_column;
use crate::dto::vehicle_dto::{CreateVehicleRequest, VehicleListQuery};
use crate::models::vehicle::{Vehicle, VehicleAssignment};
use crate::services::authorization_service::ListScope;
use crate::utils::errors::{map_unique_violation, not_found_error, AppError};

const SORTABLE_COLUMNS: &[&str] = &[
    "created_at",
    "updated_at",
    "year",
    "make",
    "model",
    "plate_number",
    "odometer",
    "status",
];

const DUPLICATE_VEHICLE: &str = "A vehicle with this VIN or plate number already exists";

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<Vehicle, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, vin, plate_number, year, make, model, color, engine_type, fuel_type,
                odometer, purchase_price, current_value, purchase_date, "group", status,
                notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $17)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.vin.to_uppercase())
        .bind(&request.plate_number)
        .bind(request.year)
        .bind(&request.make)
        .bind(&request.model)
        .bind(&request.color)
        .bind(&request.engine_type)
        .bind(request.fuel_type)
        .bind(request.odometer.unwrap_or(Decimal::ZERO))
        .bind(request.purchase_price)
        .bind(request.current_value)
        .bind(request.purchase_date)
        .bind(&request.group)
        .bind(request.status)
        .bind(&request.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_VEHICLE))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a VehicleListQuery, scope: ListScope) {
        builder.push(" WHERE deleted_at IS NULL");

        if let ListScope::AssignedVehicles(driver_id) = scope {
            builder
                .push(
                    " AND id IN (SELECT vehicle_id FROM vehicle_assignments \
                     WHERE status = 'Active' AND deleted_at IS NULL AND driver_id = ",
                )
                .push_bind(driver_id)
                .push(")");
        }

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            builder
                .push(" AND (plate_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR vin ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR make ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR model ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(group) = &query.group {
            builder.push(" AND \"group\" = ").push_bind(group);
        }
        if let Some(fuel_type) = query.fuel_type {
            builder.push(" AND fuel_type = ").push_bind(fuel_type);
        }
    }

    /// Listado paginado; devuelve la página y el total
    pub async fn list(&self, query: &VehicleListQuery, scope: ListScope) -> Result<(Vec<Vehicle>, i64), AppError> {
        let sort_column = resolve_sort_column(query.sort_by.as_deref(), SORTABLE_COLUMNS, "created_at")?;
        let pagination = query.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM vehicles");
        Self::push_filters(&mut count, query, scope);
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM vehicles");
        Self::push_filters(&mut select, query, scope);
        select
            .push(format!(" ORDER BY {} {}", sort_column, query.sort_direction.as_sql()))
            .push(" LIMIT ")
            .push_bind(pagination.per_page())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let vehicles = select.build_query_as::<Vehicle>().fetch_all(&self.pool).await?;

        Ok((vehicles, total))
    }

    pub async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vin = $2, plate_number = $3, year = $4, make = $5, model = $6, color = $7,
                engine_type = $8, fuel_type = $9, odometer = $10, purchase_price = $11,
                current_value = $12, purchase_date = $13, "group" = $14, status = $15,
                latitude = $16, longitude = $17, notes = $18, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.vin.to_uppercase())
        .bind(&vehicle.plate_number)
        .bind(vehicle.year)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(&vehicle.color)
        .bind(&vehicle.engine_type)
        .bind(vehicle.fuel_type)
        .bind(vehicle.odometer)
        .bind(vehicle.purchase_price)
        .bind(vehicle.current_value)
        .bind(vehicle.purchase_date)
        .bind(&vehicle.group)
        .bind(vehicle.status)
        .bind(vehicle.latitude)
        .bind(vehicle.longitude)
        .bind(&vehicle.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_VEHICLE))?
        .ok_or_else(|| not_found_error("Vehicle", &vehicle.id.to_string()))
    }

    pub async fn update_location(&self, id: Uuid, latitude: Decimal, longitude: Decimal) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET latitude = $2, longitude = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE vehicles SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn groups(&self) -> Result<Vec<String>, AppError> {
        let groups: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT "group" FROM vehicles
            WHERE "group" IS NOT NULL AND deleted_at IS NULL
            ORDER BY "group"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups.into_iter().map(|(group,)| group).collect())
    }

    /// Coste de mantenimiento (órdenes completadas) y rendimiento medio
    pub async fn maintenance_summary(&self, id: Uuid) -> Result<(Decimal, Option<Decimal>), AppError> {
        let (total_cost,): (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_cost), 0) FROM work_orders
            WHERE vehicle_id = $1 AND status = 'Completed' AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let (average_economy,): (Option<Decimal>,) = sqlx::query_as(
            r#"
            SELECT ROUND(AVG(fuel_economy), 2) FROM fuel_logs
            WHERE vehicle_id = $1 AND fuel_economy IS NOT NULL AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok((total_cost, average_economy))
    }

    /// El conductor tiene el vehículo asignado actualmente
    pub async fn is_assigned_to(&self, vehicle_id: Uuid, driver_id: Uuid) -> Result<bool, AppError> {
        let (assigned,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vehicle_assignments
                WHERE vehicle_id = $1 AND driver_id = $2 AND status = 'Active' AND deleted_at IS NULL
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(assigned)
    }

    /// Asigna el vehículo a un conductor cerrando la asignación activa anterior
    pub async fn assign_driver(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
        notes: Option<String>,
    ) -> Result<VehicleAssignment, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE vehicle_assignments
            SET status = 'Completed', returned_at = NOW(), updated_at = NOW()
            WHERE vehicle_id = $1 AND status = 'Active' AND deleted_at IS NULL
            "#,
        )
        .bind(vehicle_id)
        .execute(&mut *tx)
        .await?;

        let assignment = sqlx::query_as::<_, VehicleAssignment>(
            r#"
            INSERT INTO vehicle_assignments (id, vehicle_id, driver_id, assigned_at, status, notes)
            VALUES ($1, $2, $3, NOW(), 'Active', $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(driver_id)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(assignment)
    }
}
