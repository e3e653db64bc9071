//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, sus enums y las asignaciones a conductores.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status")]
pub enum VehicleStatus {
    #[sqlx(rename = "Active")]
    #[serde(rename = "Active")]
    Active,
    #[sqlx(rename = "In Service")]
    #[serde(rename = "In Service")]
    InService,
    #[sqlx(rename = "Out of Service")]
    #[serde(rename = "Out of Service")]
    OutOfService,
    #[sqlx(rename = "Sold")]
    #[serde(rename = "Sold")]
    Sold,
    #[sqlx(rename = "Retired")]
    #[serde(rename = "Retired")]
    Retired,
}

/// Tipo de combustible - mapea al ENUM vehicle_fuel_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_fuel_type")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub vin: String,
    pub plate_number: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub color: Option<String>,
    pub engine_type: Option<String>,
    pub fuel_type: FuelType,
    pub odometer: Decimal,
    pub purchase_price: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub group: Option<String>,
    pub status: VehicleStatus,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Estado de una asignación vehículo-conductor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "assignment_status")]
pub enum AssignmentStatus {
    Active,
    Completed,
}

/// Asignación de un vehículo a un conductor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleAssignment {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
