use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common_dto::resolve_sort_column;
use crate::dto::fuel_log_dto::FuelLogListQuery;
use crate::models::fuel_log::FuelLog;
use crate::services::authorization_service::ListScope;
use crate::services::fuel_economy_service::prepare_fuel_log;
use crate::utils::errors::{not_found_error, AppError};

const SORTABLE_COLUMNS: &[&str] = &["date", "odometer", "quantity", "total_cost", "created_at"];

pub struct FuelLogRepository {
    pool: PgPool,
}

impl FuelLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Último llenado completo del vehículo con fecha estrictamente anterior
    pub async fn find_previous_fillup(
        &self,
        vehicle_id: Uuid,
        before: NaiveDate,
        exclude_id: Uuid,
    ) -> Result<Option<FuelLog>, AppError> {
        let previous = sqlx::query_as::<_, FuelLog>(
            r#"
            SELECT * FROM fuel_logs
            WHERE vehicle_id = $1 AND tank_filled = TRUE AND date < $2
              AND id <> $3 AND deleted_at IS NULL
            ORDER BY date DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(before)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(previous)
    }

    async fn derive(&self, log: &mut FuelLog) -> Result<(), AppError> {
        let previous = if log.tank_filled {
            self.find_previous_fillup(log.vehicle_id, log.date, log.id).await?
        } else {
            None
        };
        prepare_fuel_log(log, previous.as_ref())?;
        Ok(())
    }

    /// Inserta el registro con coste y rendimiento recalculados
    pub async fn create(&self, mut log: FuelLog) -> Result<FuelLog, AppError> {
        self.derive(&mut log).await?;

        let created = sqlx::query_as::<_, FuelLog>(
            r#"
            INSERT INTO fuel_logs (
                id, vehicle_id, driver_id, date, odometer, quantity, unit, cost_per_unit,
                total_cost, fuel_card_number, station, tank_filled, fuel_economy, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(log.vehicle_id)
        .bind(log.driver_id)
        .bind(log.date)
        .bind(log.odometer)
        .bind(log.quantity)
        .bind(log.unit)
        .bind(log.cost_per_unit)
        .bind(log.total_cost)
        .bind(&log.fuel_card_number)
        .bind(&log.station)
        .bind(log.tank_filled)
        .bind(log.fuel_economy)
        .bind(&log.notes)
        .bind(log.created_at)
        .bind(log.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FuelLog>, AppError> {
        let log = sqlx::query_as::<_, FuelLog>(
            "SELECT * FROM fuel_logs WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(log)
    }

    fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a FuelLogListQuery, scope: ListScope) {
        builder.push(" WHERE deleted_at IS NULL");

        match scope {
            ListScope::OwnFuelLogs(driver_id) => {
                builder.push(" AND driver_id = ").push_bind(driver_id);
            }
            ListScope::AssignedVehicles(driver_id) => {
                builder
                    .push(
                        " AND vehicle_id IN (SELECT vehicle_id FROM vehicle_assignments \
                         WHERE status = 'Active' AND deleted_at IS NULL AND driver_id = ",
                    )
                    .push_bind(driver_id)
                    .push(")");
            }
            ListScope::All | ListScope::OwnWorkOrders(_) => {}
        }

        if let Some(vehicle_id) = query.vehicle_id {
            builder.push(" AND vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(driver_id) = query.driver_id {
            builder.push(" AND driver_id = ").push_bind(driver_id);
        }
        if let Some(start_date) = query.start_date {
            builder.push(" AND date >= ").push_bind(start_date);
        }
        if let Some(end_date) = query.end_date {
            builder.push(" AND date <= ").push_bind(end_date);
        }
    }

    pub async fn list(&self, query: &FuelLogListQuery, scope: ListScope) -> Result<(Vec<FuelLog>, i64), AppError> {
        let sort_column = resolve_sort_column(query.sort_by.as_deref(), SORTABLE_COLUMNS, "date")?;
        let pagination = query.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM fuel_logs");
        Self::push_filters(&mut count, query, scope);
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM fuel_logs");
        Self::push_filters(&mut select, query, scope);
        select
            .push(format!(
                " ORDER BY {} {}, created_at DESC",
                sort_column,
                query.sort_direction.as_sql()
            ))
            .push(" LIMIT ")
            .push_bind(pagination.per_page())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let logs = select.build_query_as::<FuelLog>().fetch_all(&self.pool).await?;

        Ok((logs, total))
    }

    /// Guarda los cambios; los derivados se recalculan con el estado nuevo
    pub async fn update(&self, mut log: FuelLog) -> Result<FuelLog, AppError> {
        self.derive(&mut log).await?;

        let updated = sqlx::query_as::<_, FuelLog>(
            r#"
            UPDATE fuel_logs
            SET vehicle_id = $2, driver_id = $3, date = $4, odometer = $5, quantity = $6,
                unit = $7, cost_per_unit = $8, total_cost = $9, fuel_card_number = $10,
                station = $11, tank_filled = $12, fuel_economy = $13, notes = $14,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(log.vehicle_id)
        .bind(log.driver_id)
        .bind(log.date)
        .bind(log.odometer)
        .bind(log.quantity)
        .bind(log.unit)
        .bind(log.cost_per_unit)
        .bind(log.total_cost)
        .bind(&log.fuel_card_number)
        .bind(&log.station)
        .bind(log.tank_filled)
        .bind(log.fuel_economy)
        .bind(&log.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Fuel log", &log.id.to_string()))?;

        Ok(updated)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE fuel_logs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
