//! Derivación de coste y rendimiento de combustible
//!
//! Se invoca explícitamente antes de cada INSERT/UPDATE de `fuel_logs`.
//! Los registros posteriores no se recalculan cuando cambia uno anterior.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::fuel_log::FuelLog;
use crate::utils::validation::numeric_max;

/// Límite de `fuel_logs.total_cost`, `NUMERIC(14, 2)`
pub const MAX_TOTAL_COST: Decimal = numeric_max(14);
/// Límite de `fuel_logs.fuel_economy`, `NUMERIC(13, 2)`
pub const MAX_FUEL_ECONOMY: Decimal = numeric_max(13);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FuelEconomyError {
    #[error("Fuel total cost is out of range")]
    TotalCostOutOfRange,
    #[error("Fuel economy is out of range")]
    FuelEconomyOutOfRange,
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `quantity × cost_per_unit` con dos decimales
pub fn compute_total_cost(quantity: Decimal, cost_per_unit: Decimal) -> Result<Decimal, FuelEconomyError> {
    quantity
        .checked_mul(cost_per_unit)
        .map(round2)
        .filter(|total| total.abs() <= MAX_TOTAL_COST)
        .ok_or(FuelEconomyError::TotalCostOutOfRange)
}

/// Distancia recorrida por unidad de combustible desde el llenado anterior.
///
/// `Ok(None)` si la distancia no es positiva o la cantidad es cero.
pub fn compute_fuel_economy(
    odometer: Decimal,
    previous_odometer: Decimal,
    quantity: Decimal,
) -> Result<Option<Decimal>, FuelEconomyError> {
    let distance = odometer
        .checked_sub(previous_odometer)
        .ok_or(FuelEconomyError::FuelEconomyOutOfRange)?;
    if distance <= Decimal::ZERO || quantity <= Decimal::ZERO {
        return Ok(None);
    }
    distance
        .checked_div(quantity)
        .map(round2)
        .filter(|economy| *economy <= MAX_FUEL_ECONOMY)
        .map(Some)
        .ok_or(FuelEconomyError::FuelEconomyOutOfRange)
}

/// Recalcula los campos derivados de `log`.
///
/// `previous_fillup` debe ser el último llenado completo del mismo vehículo
/// con fecha estrictamente anterior (lo busca `FuelLogRepository::find_previous_fillup`).
/// Si algún cálculo se sale de rango `log` queda intacto.
pub fn prepare_fuel_log(log: &mut FuelLog, previous_fillup: Option<&FuelLog>) -> Result<(), FuelEconomyError> {
    let total_cost = compute_total_cost(log.quantity, log.cost_per_unit)?;

    let fuel_economy = match previous_fillup {
        Some(prev) if log.tank_filled && prev.vehicle_id == log.vehicle_id && prev.date < log.date => {
            compute_fuel_economy(log.odometer, prev.odometer, log.quantity)?
        }
        _ => None,
    };

    log.total_cost = total_cost;
    log.fuel_economy = fuel_economy;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fuel_log::fixtures::fuel_log;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_total_cost_rounds_to_cents() {
        let total = compute_total_cost(Decimal::new(455, 1), Decimal::new(145, 2)).unwrap();
        assert_eq!(total, Decimal::new(6598, 2));
    }

    #[test]
    fn test_total_cost_overrides_caller_value() {
        let vehicle = Uuid::new_v4();
        let mut log = fuel_log(vehicle, day(1), Decimal::new(14850, 0), Decimal::new(455, 1));
        log.total_cost = Decimal::new(999, 0);
        prepare_fuel_log(&mut log, None).unwrap();
        assert_eq!(log.total_cost, Decimal::new(6598, 2));
        assert_eq!(log.fuel_economy, None);
    }

    #[test]
    fn test_second_fillup_derives_economy() {
        let vehicle = Uuid::new_v4();
        let first = fuel_log(vehicle, day(1), Decimal::new(14850, 0), Decimal::new(455, 1));
        let mut second = fuel_log(vehicle, day(8), Decimal::new(15200, 0), Decimal::new(455, 1));

        prepare_fuel_log(&mut second, Some(&first)).unwrap();
        assert_eq!(second.fuel_economy, Some(Decimal::new(769, 2)));
    }

    #[test]
    fn test_partial_fill_has_no_economy() {
        let vehicle = Uuid::new_v4();
        let first = fuel_log(vehicle, day(1), Decimal::new(14850, 0), Decimal::new(455, 1));
        let mut partial = fuel_log(vehicle, day(8), Decimal::new(15200, 0), Decimal::new(200, 1));
        partial.tank_filled = false;
        partial.fuel_economy = Some(Decimal::ONE);

        prepare_fuel_log(&mut partial, Some(&first)).unwrap();
        assert_eq!(partial.fuel_economy, None);
        assert_eq!(partial.total_cost, Decimal::new(2900, 2));
    }

    #[test]
    fn test_non_positive_distance_leaves_economy_unset() {
        let vehicle = Uuid::new_v4();
        let first = fuel_log(vehicle, day(1), Decimal::new(15200, 0), Decimal::new(455, 1));
        let mut rollback = fuel_log(vehicle, day(8), Decimal::new(15200, 0), Decimal::new(455, 1));
        prepare_fuel_log(&mut rollback, Some(&first)).unwrap();
        assert_eq!(rollback.fuel_economy, None);

        assert_eq!(
            compute_fuel_economy(Decimal::new(15200, 0), Decimal::new(14850, 0), Decimal::ZERO),
            Ok(None)
        );
    }

    #[test]
    fn test_same_day_or_other_vehicle_is_not_a_baseline() {
        let vehicle = Uuid::new_v4();
        let same_day = fuel_log(vehicle, day(8), Decimal::new(14850, 0), Decimal::new(455, 1));
        let other = fuel_log(Uuid::new_v4(), day(1), Decimal::new(14850, 0), Decimal::new(455, 1));
        let mut log = fuel_log(vehicle, day(8), Decimal::new(15200, 0), Decimal::new(455, 1));

        prepare_fuel_log(&mut log, Some(&same_day)).unwrap();
        assert_eq!(log.fuel_economy, None);
        prepare_fuel_log(&mut log, Some(&other)).unwrap();
        assert_eq!(log.fuel_economy, None);
    }

    #[test]
    fn test_total_cost_overflow_is_an_error() {
        let huge = Decimal::from_str_exact("79228162514264337593543950335").unwrap();
        assert_eq!(
            compute_total_cost(huge, Decimal::TWO),
            Err(FuelEconomyError::TotalCostOutOfRange)
        );

        let vehicle = Uuid::new_v4();
        let mut log = fuel_log(vehicle, day(1), Decimal::new(14850, 0), huge);
        log.cost_per_unit = Decimal::TWO;
        log.total_cost = Decimal::new(7, 0);
        assert!(prepare_fuel_log(&mut log, None).is_err());
        assert_eq!(log.total_cost, Decimal::new(7, 0));
    }

    #[test]
    fn test_largest_accepted_inputs_fit_their_columns() {
        use crate::utils::validation::{MAX_NUMERIC_10_2, MAX_NUMERIC_8_2};

        let total = compute_total_cost(MAX_NUMERIC_8_2, MAX_NUMERIC_8_2).unwrap();
        assert!(total <= MAX_TOTAL_COST);

        let economy = compute_fuel_economy(MAX_NUMERIC_10_2, Decimal::ZERO, Decimal::new(1, 2))
            .unwrap()
            .unwrap();
        assert!(economy <= MAX_FUEL_ECONOMY);
    }
}
