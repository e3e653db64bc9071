use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common_dto::{resolve_sort_column, SortDirection};
use crate::dto::driver_dto::{CurrentAssignment, DriverListQuery, DriverResponse, DriverUser};
use crate::models::driver::{Driver, LicenseExpiryStatus, EXPIRY_WARNING_DAYS};
use crate::utils::errors::{map_unique_violation, not_found_error, AppError};

const SORTABLE_COLUMNS: &[&str] = &["license_number", "license_class", "license_expiry", "created_at"];

const DUPLICATE_LICENSE: &str = "The license number has already been taken";

// Ficha + usuario + asignación activa (si la hay) con su vehículo
const DETAIL_SELECT: &str = r#"
    SELECT d.*,
           u.name AS user_name, u.email AS user_email, u.phone AS user_phone,
           u.is_active AS user_is_active,
           a.id AS assignment_id, a.assigned_at,
           v.id AS vehicle_id, v.vin AS vehicle_vin, v.plate_number AS vehicle_plate_number,
           v.make AS vehicle_make, v.model AS vehicle_model
    FROM drivers d
    JOIN users u ON u.id = d.user_id AND u.deleted_at IS NULL
    LEFT JOIN LATERAL (
        SELECT va.id, va.vehicle_id, va.assigned_at FROM vehicle_assignments va
        WHERE va.driver_id = d.user_id AND va.status = 'Active' AND va.deleted_at IS NULL
        ORDER BY va.assigned_at DESC
        LIMIT 1
    ) a ON TRUE
    LEFT JOIN vehicles v ON v.id = a.vehicle_id AND v.deleted_at IS NULL
"#;

#[derive(Debug, FromRow)]
struct DriverRow {
    #[sqlx(flatten)]
    driver: Driver,
    user_name: String,
    user_email: String,
    user_phone: Option<String>,
    user_is_active: bool,
    assignment_id: Option<Uuid>,
    assigned_at: Option<DateTime<Utc>>,
    vehicle_id: Option<Uuid>,
    vehicle_vin: Option<String>,
    vehicle_plate_number: Option<String>,
    vehicle_make: Option<String>,
    vehicle_model: Option<String>,
}

impl DriverRow {
    fn into_response(self, today: NaiveDate) -> DriverResponse {
        let current_assignment = match (
            self.assignment_id,
            self.assigned_at,
            self.vehicle_id,
            self.vehicle_vin,
            self.vehicle_plate_number,
            self.vehicle_make,
            self.vehicle_model,
        ) {
            (
                Some(assignment_id),
                Some(assigned_at),
                Some(vehicle_id),
                Some(vin),
                Some(plate_number),
                Some(make),
                Some(model),
            ) => Some(CurrentAssignment {
                assignment_id,
                assigned_at,
                vehicle_id,
                vin,
                plate_number,
                make,
                model,
            }),
            _ => None,
        };

        DriverResponse {
            license_expiry_status: self.driver.license_expiry_status(today),
            user: DriverUser {
                id: self.driver.user_id,
                name: self.user_name,
                email: self.user_email,
                phone: self.user_phone,
                is_active: self.user_is_active,
            },
            driver: self.driver,
            current_assignment,
        }
    }
}

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, driver: &Driver) -> Result<Driver, AppError> {
        sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (
                id, user_id, license_number, license_class, license_expiry,
                emergency_contact_name, emergency_contact_phone, certifications,
                training_records, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(driver.id)
        .bind(driver.user_id)
        .bind(&driver.license_number)
        .bind(&driver.license_class)
        .bind(driver.license_expiry)
        .bind(&driver.emergency_contact_name)
        .bind(&driver.emergency_contact_phone)
        .bind(&driver.certifications)
        .bind(&driver.training_records)
        .bind(driver.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_LICENSE))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn exists_for_user(&self, user_id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM drivers WHERE user_id = $1 AND deleted_at IS NULL)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Ficha con usuario, estado de licencia y asignación activa
    pub async fn find_detail(&self, id: Uuid, today: NaiveDate) -> Result<Option<DriverResponse>, AppError> {
        let mut select = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        select.push(" WHERE d.deleted_at IS NULL AND d.id = ").push_bind(id);

        let row = select.build_query_as::<DriverRow>().fetch_optional(&self.pool).await?;

        Ok(row.map(|row| row.into_response(today)))
    }

    fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a DriverListQuery, today: NaiveDate) {
        builder.push(" WHERE d.deleted_at IS NULL");

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            builder
                .push(" AND (d.license_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(license_class) = &query.license_class {
            builder.push(" AND d.license_class = ").push_bind(license_class);
        }
        // Misma frontera que `classify_license_expiry`
        let warning_limit = today + Duration::days(EXPIRY_WARNING_DAYS);
        match query.license_status {
            Some(LicenseExpiryStatus::Expired) => {
                builder.push(" AND d.license_expiry < ").push_bind(today);
            }
            Some(LicenseExpiryStatus::ExpiringSoon) => {
                builder
                    .push(" AND d.license_expiry >= ")
                    .push_bind(today)
                    .push(" AND d.license_expiry <= ")
                    .push_bind(warning_limit);
            }
            Some(LicenseExpiryStatus::Valid) => {
                builder.push(" AND d.license_expiry > ").push_bind(warning_limit);
            }
            None => {}
        }
    }

    pub async fn list(
        &self,
        query: &DriverListQuery,
        today: NaiveDate,
    ) -> Result<(Vec<DriverResponse>, i64), AppError> {
        let sort_column = resolve_sort_column(query.sort_by.as_deref(), SORTABLE_COLUMNS, "license_number")?;
        let direction = query.sort_direction.unwrap_or(SortDirection::Asc);
        let pagination = query.pagination();

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM drivers d JOIN users u ON u.id = d.user_id AND u.deleted_at IS NULL",
        );
        Self::push_filters(&mut count, query, today);
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        Self::push_filters(&mut select, query, today);
        select
            .push(format!(" ORDER BY d.{} {}", sort_column, direction.as_sql()))
            .push(" LIMIT ")
            .push_bind(pagination.per_page())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows = select.build_query_as::<DriverRow>().fetch_all(&self.pool).await?;
        let drivers = rows.into_iter().map(|row| row.into_response(today)).collect();

        Ok((drivers, total))
    }

    pub async fn update(&self, driver: &Driver) -> Result<Driver, AppError> {
        sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET license_number = $2, license_class = $3, license_expiry = $4,
                emergency_contact_name = $5, emergency_contact_phone = $6,
                certifications = $7, training_records = $8, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(driver.id)
        .bind(&driver.license_number)
        .bind(&driver.license_class)
        .bind(driver.license_expiry)
        .bind(&driver.emergency_contact_name)
        .bind(&driver.emergency_contact_phone)
        .bind(&driver.certifications)
        .bind(&driver.training_records)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_LICENSE))?
        .ok_or_else(|| not_found_error("Driver", &driver.id.to_string()))
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE drivers SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
