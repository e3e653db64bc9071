use chrono::Utc;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common_dto::{resolve_sort_column, SortDirection};
use crate::dto::part_dto::{CreatePartRequest, PartListQuery, PartUsage};
use crate::models::part::Part;
use crate::services::inventory_service::{self, AdjustmentMode, StockMovement};
use crate::utils::errors::{map_unique_violation, not_found_error, AppError};

const SORTABLE_COLUMNS: &[&str] = &[
    "name",
    "part_number",
    "category",
    "manufacturer",
    "quantity_in_stock",
    "unit_price",
    "created_at",
];

const DUPLICATE_PART: &str = "The part number has already been taken";

pub struct PartRepository {
    pool: PgPool,
}

impl PartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreatePartRequest) -> Result<Part, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Part>(
            r#"
            INSERT INTO parts (
                id, part_number, name, description, category, manufacturer,
                quantity_in_stock, minimum_stock_level, unit_price, location,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.part_number)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.category)
        .bind(&request.manufacturer)
        .bind(request.quantity_in_stock)
        .bind(request.minimum_stock_level)
        .bind(request.unit_price)
        .bind(&request.location)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_PART))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Part>, AppError> {
        let part = sqlx::query_as::<_, Part>(
            "SELECT * FROM parts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(part)
    }

    fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a PartListQuery) {
        builder.push(" WHERE deleted_at IS NULL");

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            builder
                .push(" AND (part_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(category) = &query.category {
            builder.push(" AND category = ").push_bind(category);
        }
        if let Some(manufacturer) = &query.manufacturer {
            builder.push(" AND manufacturer = ").push_bind(manufacturer);
        }
        if query.low_stock {
            builder.push(" AND quantity_in_stock <= minimum_stock_level");
        }
    }

    pub async fn list(&self, query: &PartListQuery) -> Result<(Vec<Part>, i64), AppError> {
        let sort_column = resolve_sort_column(query.sort_by.as_deref(), SORTABLE_COLUMNS, "name")?;
        let direction = query.sort_direction.unwrap_or(SortDirection::Asc);
        let pagination = query.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM parts");
        Self::push_filters(&mut count, query);
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM parts");
        Self::push_filters(&mut select, query);
        select
            .push(format!(" ORDER BY {} {}", sort_column, direction.as_sql()))
            .push(" LIMIT ")
            .push_bind(pagination.per_page())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let parts = select.build_query_as::<Part>().fetch_all(&self.pool).await?;

        Ok((parts, total))
    }

    /// Modifica el repuesto bajo `FOR UPDATE`, serializado con los ajustes de stock
    pub async fn update_with<F>(&self, id: Uuid, mutate: F) -> Result<Part, AppError>
    where
        F: FnOnce(&mut Part) -> Result<(), AppError>,
    {
        let mut tx = self.pool.begin().await?;

        let mut part = Self::lock_many(&mut tx, &[id])
            .await?
            .pop()
            .ok_or_else(|| not_found_error("Part", &id.to_string()))?;

        mutate(&mut part)?;
        let saved = Self::save(&mut tx, &part).await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn save(conn: &mut PgConnection, part: &Part) -> Result<Part, AppError> {
        sqlx::query_as::<_, Part>(
            r#"
            UPDATE parts
            SET part_number = $2, name = $3, description = $4, category = $5,
                manufacturer = $6, quantity_in_stock = $7, minimum_stock_level = $8,
                unit_price = $9, location = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(part.id)
        .bind(&part.part_number)
        .bind(&part.name)
        .bind(&part.description)
        .bind(&part.category)
        .bind(&part.manufacturer)
        .bind(part.quantity_in_stock)
        .bind(part.minimum_stock_level)
        .bind(part.unit_price)
        .bind(&part.location)
        .fetch_one(conn)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_PART))
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE parts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Alertas de reposición
    pub async fn low_stock(&self) -> Result<Vec<Part>, AppError> {
        let parts = sqlx::query_as::<_, Part>(
            r#"
            SELECT * FROM parts
            WHERE quantity_in_stock <= minimum_stock_level AND deleted_at IS NULL
            ORDER BY quantity_in_stock ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(parts)
    }

    pub async fn categories(&self) -> Result<Vec<String>, AppError> {
        self.distinct_values("category").await
    }

    pub async fn manufacturers(&self) -> Result<Vec<String>, AppError> {
        self.distinct_values("manufacturer").await
    }

    async fn distinct_values(&self, column: &'static str) -> Result<Vec<String>, AppError> {
        let sql = format!(
            "SELECT DISTINCT {col} FROM parts WHERE {col} IS NOT NULL AND deleted_at IS NULL ORDER BY {col}",
            col = column
        );
        let rows: Vec<(String,)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(value,)| value).collect())
    }

    /// Órdenes en las que se ha usado el repuesto
    pub async fn usage(&self, part_id: Uuid) -> Result<Vec<PartUsage>, AppError> {
        let usage = sqlx::query_as::<_, PartUsage>(
            r#"
            SELECT wo.id AS work_order_id, wo.work_order_number, wop.quantity_used,
                   wop.unit_price, wop.total_price, wop.created_at AS attached_at
            FROM work_order_parts wop
            JOIN work_orders wo ON wo.id = wop.work_order_id
            WHERE wop.part_id = $1 AND wo.deleted_at IS NULL
            ORDER BY wop.created_at DESC
            "#,
        )
        .bind(part_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(usage)
    }

    /// Bloquea los repuestos indicados (en orden de id) dentro de una transacción
    pub async fn lock_many(conn: &mut PgConnection, ids: &[Uuid]) -> Result<Vec<Part>, AppError> {
        let parts = sqlx::query_as::<_, Part>(
            r#"
            SELECT * FROM parts
            WHERE id = ANY($1) AND deleted_at IS NULL
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(ids)
        .fetch_all(conn)
        .await?;

        Ok(parts)
    }

    pub async fn save_stock(conn: &mut PgConnection, part: &Part) -> Result<Part, AppError> {
        let saved = sqlx::query_as::<_, Part>(
            "UPDATE parts SET quantity_in_stock = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(part.id)
        .bind(part.quantity_in_stock)
        .fetch_one(conn)
        .await?;

        Ok(saved)
    }

    /// Ajuste manual de stock con el repuesto bloqueado
    pub async fn adjust_stock(
        &self,
        id: Uuid,
        amount: i32,
        mode: AdjustmentMode,
    ) -> Result<(Part, StockMovement), AppError> {
        let mut tx = self.pool.begin().await?;

        let mut part = Self::lock_many(&mut tx, &[id])
            .await?
            .pop()
            .ok_or_else(|| not_found_error("Part", &id.to_string()))?;

        let movement = inventory_service::adjust(&mut part, amount, mode)?;
        let saved = Self::save_stock(&mut tx, &part).await?;

        tx.commit().await?;

        Ok((saved, movement))
    }
}
