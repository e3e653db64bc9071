use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vendor::Vendor;
use crate::utils::errors::AppError;

pub struct VendorRepository {
    pool: PgPool,
}

impl VendorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vendor: &Vendor) -> Result<Vendor, AppError> {
        let vendor = sqlx::query_as::<_, Vendor>(
            r#"
            INSERT INTO vendors (
                id, name, contact_person, email, phone, address, specialty, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(vendor.id)
        .bind(&vendor.name)
        .bind(&vendor.contact_person)
        .bind(&vendor.email)
        .bind(&vendor.phone)
        .bind(&vendor.address)
        .bind(&vendor.specialty)
        .bind(&vendor.notes)
        .bind(vendor.created_at)
        .bind(vendor.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(vendor)
    }

    pub async fn list(&self) -> Result<Vec<Vendor>, AppError> {
        let vendors = sqlx::query_as::<_, Vendor>(
            "SELECT * FROM vendors WHERE deleted_at IS NULL ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vendors)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vendors WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
