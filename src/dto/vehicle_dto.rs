use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dto::common_dto::{PaginationParams, SortDirection};
use crate::models::vehicle::{FuelType, Vehicle, VehicleStatus};
use crate::utils::validation::{
    validate_latitude, validate_longitude, validate_numeric_10_2, validate_numeric_12_2,
    validate_vehicle_year, VIN_REGEX,
};

// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_create_vehicle"))]
pub struct CreateVehicleRequest {
    #[validate(regex = "VIN_REGEX")]
    pub vin: String,
    #[validate(length(min = 1, max = 20))]
    pub plate_number: String,
    pub year: i32,
    #[validate(length(min = 1, max = 100))]
    pub make: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(length(max = 100))]
    pub engine_type: Option<String>,
    pub fuel_type: FuelType,
    #[validate(custom = "validate_numeric_10_2")]
    pub odometer: Option<Decimal>,
    #[validate(custom = "validate_numeric_12_2")]
    pub purchase_price: Option<Decimal>,
    #[validate(custom = "validate_numeric_12_2")]
    pub current_value: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub group: Option<String>,
    pub status: VehicleStatus,
    pub notes: Option<String>,
}

fn validate_create_vehicle(request: &CreateVehicleRequest) -> Result<(), ValidationError> {
    validate_vehicle_year(request.year)
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_update_vehicle"))]
pub struct UpdateVehicleRequest {
    #[validate(regex = "VIN_REGEX")]
    pub vin: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub plate_number: Option<String>,
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(length(max = 100))]
    pub engine_type: Option<String>,
    pub fuel_type: Option<FuelType>,
    #[validate(custom = "validate_numeric_10_2")]
    pub odometer: Option<Decimal>,
    #[validate(custom = "validate_numeric_12_2")]
    pub purchase_price: Option<Decimal>,
    #[validate(custom = "validate_numeric_12_2")]
    pub current_value: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub group: Option<String>,
    pub status: Option<VehicleStatus>,
    #[validate(custom = "validate_latitude")]
    pub latitude: Option<Decimal>,
    #[validate(custom = "validate_longitude")]
    pub longitude: Option<Decimal>,
    pub notes: Option<String>,
}

fn validate_update_vehicle(request: &UpdateVehicleRequest) -> Result<(), ValidationError> {
    match request.year {
        Some(year) => validate_vehicle_year(year),
        None => Ok(()),
    }
}

impl UpdateVehicleRequest {
    /// Aplica los campos presentes sobre el vehículo
    pub fn apply_to(self, vehicle: &mut Vehicle) {
        if let Some(vin) = self.vin {
            vehicle.vin = vin;
        }
        if let Some(plate_number) = self.plate_number {
            vehicle.plate_number = plate_number;
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
        if let Some(make) = self.make {
            vehicle.make = make;
        }
        if let Some(model) = self.model {
            vehicle.model = model;
        }
        if self.color.is_some() {
            vehicle.color = self.color;
        }
        if self.engine_type.is_some() {
            vehicle.engine_type = self.engine_type;
        }
        if let Some(fuel_type) = self.fuel_type {
            vehicle.fuel_type = fuel_type;
        }
        if let Some(odometer) = self.odometer {
            vehicle.odometer = odometer;
        }
        if self.purchase_price.is_some() {
            vehicle.purchase_price = self.purchase_price;
        }
        if self.current_value.is_some() {
            vehicle.current_value = self.current_value;
        }
        if self.purchase_date.is_some() {
            vehicle.purchase_date = self.purchase_date;
        }
        if self.group.is_some() {
            vehicle.group = self.group;
        }
        if let Some(status) = self.status {
            vehicle.status = status;
        }
        if self.latitude.is_some() {
            vehicle.latitude = self.latitude;
        }
        if self.longitude.is_some() {
            vehicle.longitude = self.longitude;
        }
        if self.notes.is_some() {
            vehicle.notes = self.notes;
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(custom = "validate_latitude")]
    pub latitude: Decimal,
    #[validate(custom = "validate_longitude")]
    pub longitude: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    pub driver_id: Uuid,
    pub notes: Option<String>,
}

/// Filtros de `GET /vehicles`
#[derive(Debug, Default, Deserialize)]
pub struct VehicleListQuery {
    pub search: Option<String>,
    pub status: Option<VehicleStatus>,
    pub group: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl VehicleListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams { page: self.page, per_page: self.per_page }
    }
}

/// Detalle de vehículo con agregados
#[derive(Debug, Serialize)]
pub struct VehicleDetailResponse {
    pub vehicle: Vehicle,
    pub total_maintenance_cost: Decimal,
    pub average_fuel_economy: Option<Decimal>,
}
