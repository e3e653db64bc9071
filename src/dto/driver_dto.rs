use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{PaginationParams, SortDirection};
use crate::models::driver::{Driver, LicenseExpiryStatus};
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub license_number: String,
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub license_class: String,
    pub license_expiry: NaiveDate,
    #[validate(length(max = 255))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(max = 20))]
    pub emergency_contact_phone: Option<String>,
    pub certifications: Option<String>,
    pub training_records: Option<String>,
}

impl From<CreateDriverRequest> for Driver {
    fn from(request: CreateDriverRequest) -> Self {
        let now = Utc::now();
        Driver {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            license_number: request.license_number.trim().to_string(),
            license_class: request.license_class.trim().to_string(),
            license_expiry: request.license_expiry,
            emergency_contact_name: request.emergency_contact_name,
            emergency_contact_phone: request.emergency_contact_phone,
            certifications: request.certifications,
            training_records: request.training_records,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// El usuario dueño de la ficha no se puede cambiar
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub license_number: Option<String>,
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub license_class: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(max = 20))]
    pub emergency_contact_phone: Option<String>,
    pub certifications: Option<String>,
    pub training_records: Option<String>,
}

impl UpdateDriverRequest {
    pub fn apply_to(self, driver: &mut Driver) {
        if let Some(license_number) = self.license_number {
            driver.license_number = license_number.trim().to_string();
        }
        if let Some(license_class) = self.license_class {
            driver.license_class = license_class.trim().to_string();
        }
        if let Some(license_expiry) = self.license_expiry {
            driver.license_expiry = license_expiry;
        }
        if self.emergency_contact_name.is_some() {
            driver.emergency_contact_name = self.emergency_contact_name;
        }
        if self.emergency_contact_phone.is_some() {
            driver.emergency_contact_phone = self.emergency_contact_phone;
        }
        if self.certifications.is_some() {
            driver.certifications = self.certifications;
        }
        if self.training_records.is_some() {
            driver.training_records = self.training_records;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DriverListQuery {
    pub search: Option<String>,
    pub license_class: Option<String>,
    pub license_status: Option<LicenseExpiryStatus>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl DriverListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams { page: self.page, per_page: self.per_page }
    }
}

/// Usuario dueño de la ficha
#[derive(Debug, Clone, Serialize)]
pub struct DriverUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
}

/// Asignación activa con el vehículo asignado
#[derive(Debug, Clone, Serialize)]
pub struct CurrentAssignment {
    pub assignment_id: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub vehicle_id: Uuid,
    pub vin: String,
    pub plate_number: String,
    pub make: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct DriverResponse {
    #[serde(flatten)]
    pub driver: Driver,
    pub license_expiry_status: LicenseExpiryStatus,
    pub user: DriverUser,
    pub current_assignment: Option<CurrentAssignment>,
}
