use chrono::Utc;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

use crate::dto::common_dto::resolve_sort_column;
use crate::dto::work_order_dto::WorkOrderListQuery;
use crate::models::part::{Part, WorkOrderPartDetail};
use crate::models::work_order::{NewWorkOrder, WorkOrder, WorkOrderStatus};
use crate::repositories::part_repository::PartRepository;
use crate::services::authorization_service::ListScope;
use crate::services::work_order_service::{
    apply_status, attach_parts, calculate_total_cost, format_work_order_number, parse_status, AttachedPart, PartRequest,
};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::parse_filter;

const SORTABLE_COLUMNS: &[&str] = &[
    "created_at",
    "updated_at",
    "scheduled_date",
    "work_order_number",
    "priority",
    "status",
    "total_cost",
];

pub struct WorkOrderRepository {
    pool: PgPool,
}

impl WorkOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta la orden con un número `WO-<año>-<secuencia>` recién generado
    pub async fn create(&self, draft: NewWorkOrder) -> Result<WorkOrder, AppError> {
        let (sequence,): (i64,) = sqlx::query_as("SELECT nextval('work_order_number_seq')")
            .fetch_one(&self.pool)
            .await?;

        let work_order = WorkOrder::new(format_work_order_number(Utc::now(), sequence), draft);

        let created = sqlx::query_as::<_, WorkOrder>(
            r#"
            INSERT INTO work_orders (
                id, vehicle_id, technician_id, vendor_id, work_order_number, type, status,
                priority, description, odometer_reading, labor_hours, labor_cost, parts_cost,
                total_cost, scheduled_date, downtime_hours, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(work_order.id)
        .bind(work_order.vehicle_id)
        .bind(work_order.technician_id)
        .bind(work_order.vendor_id)
        .bind(&work_order.work_order_number)
        .bind(work_order.work_type)
        .bind(work_order.status)
        .bind(work_order.priority)
        .bind(&work_order.description)
        .bind(work_order.odometer_reading)
        .bind(work_order.labor_hours)
        .bind(work_order.labor_cost)
        .bind(work_order.parts_cost)
        .bind(work_order.total_cost)
        .bind(work_order.scheduled_date)
        .bind(work_order.downtime_hours)
        .bind(&work_order.notes)
        .bind(work_order.created_at)
        .bind(work_order.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkOrder>, AppError> {
        let work_order = sqlx::query_as::<_, WorkOrder>(
            "SELECT * FROM work_orders WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(work_order)
    }

    fn push_filters<'a>(
        builder: &mut QueryBuilder<'a, Postgres>,
        query: &'a WorkOrderListQuery,
        status: Option<WorkOrderStatus>,
        scope: ListScope,
    ) {
        builder.push(" WHERE deleted_at IS NULL");

        match scope {
            ListScope::OwnWorkOrders(technician_id) => {
                builder.push(" AND technician_id = ").push_bind(technician_id);
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
            ListScope::All | ListScope::OwnFuelLogs(_) => {}
        }

        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(work_type) = query.work_type {
            builder.push(" AND type = ").push_bind(work_type);
        }
        if let Some(priority) = query.priority {
            builder.push(" AND priority = ").push_bind(priority);
        }
        if let Some(vehicle_id) = query.vehicle_id {
            builder.push(" AND vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(technician_id) = query.technician_id {
            builder.push(" AND technician_id = ").push_bind(technician_id);
        }
        if let Some(start_date) = query.start_date {
            builder.push(" AND created_at::date >= ").push_bind(start_date);
        }
        if let Some(end_date) = query.end_date {
            builder.push(" AND created_at::date <= ").push_bind(end_date);
        }
    }

    /// Listado paginado con filtros; `scope` restringe por rol
    pub async fn list(&self, query: &WorkOrderListQuery, scope: ListScope) -> Result<(Vec<WorkOrder>, i64), AppError> {
        let status = parse_filter::<WorkOrderStatus>("status", query.status.as_deref())?;
        let sort_column = resolve_sort_column(query.sort_by.as_deref(), SORTABLE_COLUMNS, "created_at")?;
        let pagination = query.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM work_orders");
        Self::push_filters(&mut count, query, status, scope);
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM work_orders");
        Self::push_filters(&mut select, query, status, scope);
        select
            .push(format!(" ORDER BY {} {}", sort_column, query.sort_direction.as_sql()))
            .push(" LIMIT ")
            .push_bind(pagination.per_page())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let work_orders = select.build_query_as::<WorkOrder>().fetch_all(&self.pool).await?;

        Ok((work_orders, total))
    }

    /// Repuestos consumidos por la orden, del más antiguo al más reciente
    pub async fn parts_for(&self, work_order_id: Uuid) -> Result<Vec<WorkOrderPartDetail>, AppError> {
        let parts = sqlx::query_as::<_, WorkOrderPartDetail>(
            r#"
            SELECT p.id AS part_id, p.part_number, p.name, wop.quantity_used,
                   wop.unit_price, wop.total_price, wop.created_at AS attached_at
            FROM work_order_parts wop
            JOIN parts p ON p.id = wop.part_id
            WHERE wop.work_order_id = $1
            ORDER BY wop.created_at ASC
            "#,
        )
        .bind(work_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(parts)
    }

    async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<WorkOrder, AppError> {
        sqlx::query_as::<_, WorkOrder>(
            "SELECT * FROM work_orders WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| not_found_error("Work order", &id.to_string()))
    }

    async fn save(conn: &mut PgConnection, work_order: &WorkOrder) -> Result<WorkOrder, AppError> {
        let saved = sqlx::query_as::<_, WorkOrder>(
            r#"
            UPDATE work_orders
            SET vehicle_id = $2, technician_id = $3, vendor_id = $4, type = $5, status = $6,
                priority = $7, description = $8, odometer_reading = $9, labor_hours = $10,
                labor_cost = $11, parts_cost = $12, total_cost = $13, scheduled_date = $14,
                started_at = $15, completed_at = $16, downtime_hours = $17, notes = $18,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(work_order.id)
        .bind(work_order.vehicle_id)
        .bind(work_order.technician_id)
        .bind(work_order.vendor_id)
        .bind(work_order.work_type)
        .bind(work_order.status)
        .bind(work_order.priority)
        .bind(&work_order.description)
        .bind(work_order.odometer_reading)
        .bind(work_order.labor_hours)
        .bind(work_order.labor_cost)
        .bind(work_order.parts_cost)
        .bind(work_order.total_cost)
        .bind(work_order.scheduled_date)
        .bind(work_order.started_at)
        .bind(work_order.completed_at)
        .bind(work_order.downtime_hours)
        .bind(&work_order.notes)
        .fetch_one(conn)
        .await?;

        Ok(saved)
    }

    /// Modifica la orden bloqueada; el total se recalcula siempre antes de guardar
    pub async fn update_with<F>(&self, id: Uuid, mutate: F) -> Result<WorkOrder, AppError>
    where
        F: FnOnce(&mut WorkOrder) -> Result<(), AppError>,
    {
        let mut tx = self.pool.begin().await?;

        let mut work_order = Self::lock(&mut tx, id).await?;
        mutate(&mut work_order)?;
        calculate_total_cost(&mut work_order)?;
        let saved = Self::save(&mut tx, &work_order).await?;

        tx.commit().await?;

        Ok(saved)
    }

    /// Cambio de estado desde texto (`"In Progress"`, ...)
    pub async fn set_status(&self, id: Uuid, status: &str) -> Result<WorkOrder, AppError> {
        let status = parse_status(status)?;
        self.update_with(id, |work_order| {
            apply_status(work_order, status, Utc::now());
            Ok(())
        })
        .await
    }

    pub async fn assign_technician(&self, id: Uuid, technician_id: Uuid) -> Result<WorkOrder, AppError> {
        self.update_with(id, |work_order| {
            work_order.technician_id = Some(technician_id);
            Ok(())
        })
        .await
    }

    /// Consume repuestos del inventario para la orden.
    ///
    /// Orden y repuestos quedan bloqueados (repuestos en orden de id) hasta
    /// el commit; si una línea falla no se escribe nada.
    pub async fn add_parts(
        &self,
        id: Uuid,
        lines: &[PartRequest],
    ) -> Result<(WorkOrder, Vec<AttachedPart>), AppError> {
        let mut tx = self.pool.begin().await?;

        let mut work_order = Self::lock(&mut tx, id).await?;

        let mut part_ids: Vec<Uuid> = lines.iter().map(|line| line.part_id).collect();
        part_ids.sort();
        part_ids.dedup();

        let mut inventory: HashMap<Uuid, Part> = PartRepository::lock_many(&mut tx, &part_ids)
            .await?
            .into_iter()
            .map(|part| (part.id, part))
            .collect();

        let attached = attach_parts(&mut work_order, &mut inventory, lines)?;

        let now = Utc::now();
        for line in &attached {
            sqlx::query(
                r#"
                INSERT INTO work_order_parts (
                    id, work_order_id, part_id, quantity_used, unit_price, total_price,
                    created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(work_order.id)
            .bind(line.part_id)
            .bind(line.quantity_used)
            .bind(line.unit_price)
            .bind(line.total_price)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        for part_id in &part_ids {
            if let Some(part) = inventory.get(part_id) {
                PartRepository::save_stock(&mut tx, part).await?;
            }
        }

        let saved = Self::save(&mut tx, &work_order).await?;

        tx.commit().await?;

        Ok((saved, attached))
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE work_orders SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
