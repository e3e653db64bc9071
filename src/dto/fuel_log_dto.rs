use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{PaginationParams, SortDirection};
use crate::models::fuel_log::{FuelLog, FuelUnit};
use crate::utils::validation::{validate_numeric_10_2, validate_numeric_8_2};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFuelLogRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub date: NaiveDate,
    #[validate(custom = "validate_numeric_10_2")]
    pub odometer: Decimal,
    #[validate(custom = "validate_numeric_8_2")]
    pub quantity: Decimal,
    pub unit: FuelUnit,
    #[validate(custom = "validate_numeric_8_2")]
    pub cost_per_unit: Decimal,
    pub fuel_card_number: Option<String>,
    pub station: Option<String>,
    #[serde(default)]
    pub tank_filled: bool,
    pub notes: Option<String>,
}

impl CreateFuelLogRequest {
    /// Construye el registro; los campos derivados se calculan después
    pub fn into_fuel_log(self, driver_id: Option<Uuid>) -> FuelLog {
        let now = Utc::now();
        FuelLog {
            id: Uuid::new_v4(),
            vehicle_id: self.vehicle_id,
            driver_id,
            date: self.date,
            odometer: self.odometer,
            quantity: self.quantity,
            unit: self.unit,
            cost_per_unit: self.cost_per_unit,
            total_cost: Decimal::ZERO,
            fuel_card_number: self.fuel_card_number,
            station: self.station,
            tank_filled: self.tank_filled,
            fuel_economy: None,
            notes: self.notes,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFuelLogRequest {
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    #[validate(custom = "validate_numeric_10_2")]
    pub odometer: Option<Decimal>,
    #[validate(custom = "validate_numeric_8_2")]
    pub quantity: Option<Decimal>,
    pub unit: Option<FuelUnit>,
    #[validate(custom = "validate_numeric_8_2")]
    pub cost_per_unit: Option<Decimal>,
    pub fuel_card_number: Option<String>,
    pub station: Option<String>,
    pub tank_filled: Option<bool>,
    pub notes: Option<String>,
}

impl UpdateFuelLogRequest {
    pub fn apply_to(self, log: &mut FuelLog) {
        if let Some(vehicle_id) = self.vehicle_id {
            log.vehicle_id = vehicle_id;
        }
        if self.driver_id.is_some() {
            log.driver_id = self.driver_id;
        }
        if let Some(date) = self.date {
            log.date = date;
        }
        if let Some(odometer) = self.odometer {
            log.odometer = odometer;
        }
        if let Some(quantity) = self.quantity {
            log.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            log.unit = unit;
        }
        if let Some(cost_per_unit) = self.cost_per_unit {
            log.cost_per_unit = cost_per_unit;
        }
        if self.fuel_card_number.is_some() {
            log.fuel_card_number = self.fuel_card_number;
        }
        if self.station.is_some() {
            log.station = self.station;
        }
        if let Some(tank_filled) = self.tank_filled {
            log.tank_filled = tank_filled;
        }
        if self.notes.is_some() {
            log.notes = self.notes;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FuelLogListQuery {
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl FuelLogListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams { page: self.page, per_page: self.per_page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_builds_log_without_derived_fields() {
        let request: CreateFuelLogRequest = serde_json::from_value(json!({
            "vehicle_id": Uuid::new_v4(),
            "date": "2024-05-08",
            "odometer": 15200,
            "quantity": "45.5",
            "unit": "Liters",
            "cost_per_unit": "1.45",
            "tank_filled": true
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let driver = Uuid::new_v4();
        let log = request.into_fuel_log(Some(driver));
        assert_eq!(log.driver_id, Some(driver));
        assert_eq!(log.total_cost, Decimal::ZERO);
        assert!(log.fuel_economy.is_none());
        assert!(log.tank_filled);
    }

    #[test]
    fn test_negative_quantity_is_invalid() {
        let request: CreateFuelLogRequest = serde_json::from_value(json!({
            "vehicle_id": Uuid::new_v4(),
            "date": "2024-05-08",
            "odometer": 15200,
            "quantity": "-1",
            "unit": "Gallons",
            "cost_per_unit": "3.10"
        }))
        .unwrap();
        assert!(request.validate().is_err());
        assert!(!request.tank_filled);
    }

    #[test]
    fn test_quantity_beyond_column_precision_is_invalid() {
        let request: CreateFuelLogRequest = serde_json::from_value(json!({
            "vehicle_id": Uuid::new_v4(),
            "date": "2024-05-08",
            "odometer": 15200,
            "quantity": "79228162514264337593543950335",
            "unit": "Liters",
            "cost_per_unit": "2"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
    }
}
