//! Modelo de Driver
//!
//! Datos de licencia de un usuario con rol `Driver`. Las asignaciones de
//! vehículo siguen apuntando a `users.id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Días de margen antes de la caducidad para avisar
pub const EXPIRY_WARNING_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_number: String,
    pub license_class: String,
    pub license_expiry: NaiveDate,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub certifications: Option<String>,
    pub training_records: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Estado de la licencia respecto a hoy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseExpiryStatus {
    Expired,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    Valid,
}

/// Caducada si ya pasó; "por caducar" si quedan 30 días o menos (hoy incluido)
pub fn classify_license_expiry(expiry: NaiveDate, today: NaiveDate) -> LicenseExpiryStatus {
    let days_left = (expiry - today).num_days();
    if days_left < 0 {
        LicenseExpiryStatus::Expired
    } else if days_left <= EXPIRY_WARNING_DAYS {
        LicenseExpiryStatus::ExpiringSoon
    } else {
        LicenseExpiryStatus::Valid
    }
}

impl Driver {
    pub fn license_expiry_status(&self, today: NaiveDate) -> LicenseExpiryStatus {
        classify_license_expiry(self.license_expiry, today)
    }
}
