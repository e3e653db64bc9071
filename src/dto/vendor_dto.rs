use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::vendor::Vendor;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub specialty: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateVendorRequest> for Vendor {
    fn from(request: CreateVendorRequest) -> Self {
        let now = Utc::now();
        Vendor {
            id: Uuid::new_v4(),
            name: request.name,
            contact_person: request.contact_person,
            email: request.email,
            phone: request.phone,
            address: request.address,
            specialty: request.specialty,
            notes: request.notes,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vendor_email_is_validated() {
        let request: CreateVendorRequest =
            serde_json::from_value(json!({ "name": "QuickFix Garage", "email": "nope" })).unwrap();
        assert!(request.validate().is_err());

        let request: CreateVendorRequest =
            serde_json::from_value(json!({ "name": "QuickFix Garage", "specialty": "Brakes" })).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(Vendor::from(request).specialty.as_deref(), Some("Brakes"));
    }
}
