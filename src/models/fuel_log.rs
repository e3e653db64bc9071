//! Modelo de FuelLog
//!
//! `total_cost` y `fuel_economy` son derivados; ver `services::fuel_economy_service`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Unidad de combustible - mapea al ENUM fuel_unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "fuel_unit")]
pub enum FuelUnit {
    Liters,
    Gallons,
}

/// FuelLog - mapea exactamente a la tabla fuel_logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelLog {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub date: NaiveDate,
    pub odometer: Decimal,
    pub quantity: Decimal,
    pub unit: FuelUnit,
    pub cost_per_unit: Decimal,
    pub total_cost: Decimal,
    pub fuel_card_number: Option<String>,
    pub station: Option<String>,
    pub tank_filled: bool,
    pub fuel_economy: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn fuel_log(vehicle_id: Uuid, date: NaiveDate, odometer: Decimal, quantity: Decimal) -> FuelLog {
        let now = Utc::now();
        FuelLog {
            id: Uuid::new_v4(),
            vehicle_id,
            driver_id: None,
            date,
            odometer,
            quantity,
            unit: FuelUnit::Liters,
            cost_per_unit: Decimal::new(145, 2),
            total_cost: Decimal::ZERO,
            fuel_card_number: None,
            station: None,
            tank_filled: true,
            fuel_economy: None,
            notes: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
