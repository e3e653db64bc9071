//! Utilidades de validación
//!
//! Validadores personalizados para los DTOs (`#[validate(custom = "...")]`)
//! y helpers de conversión de filtros de consulta.

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use validator::ValidationError;

use crate::utils::errors::AppError;

lazy_static! {
    /// VIN: exactamente 17 caracteres alfanuméricos
    pub static ref VIN_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{17}$").expect("valid VIN regex");
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Máximo representable por una columna `NUMERIC(precision, 2)`
pub const fn numeric_max(precision: u32) -> Decimal {
    Decimal::from_parts(
        (10u64.pow(precision) - 1) as u32,
        ((10u64.pow(precision) - 1) >> 32) as u32,
        0,
        false,
        2,
    )
}

pub const MAX_NUMERIC_5_2: Decimal = numeric_max(5);
pub const MAX_NUMERIC_8_2: Decimal = numeric_max(8);
pub const MAX_NUMERIC_10_2: Decimal = numeric_max(10);
pub const MAX_NUMERIC_12_2: Decimal = numeric_max(12);

/// No negativo y dentro de la columna destino
fn validate_non_negative_up_to(value: &Decimal, max: Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)?;
    if *value > max {
        let mut error = ValidationError::new("range");
        error.add_param("value".into(), value);
        error.add_param("max".into(), &max);
        return Err(error);
    }
    Ok(())
}

/// Horas de mano de obra, `NUMERIC(5, 2)`
pub fn validate_numeric_5_2(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative_up_to(value, MAX_NUMERIC_5_2)
}

/// Cantidades y precios de combustible, `NUMERIC(8, 2)`
pub fn validate_numeric_8_2(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative_up_to(value, MAX_NUMERIC_8_2)
}

/// Odómetros, precios unitarios y costes, `NUMERIC(10, 2)`
pub fn validate_numeric_10_2(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative_up_to(value, MAX_NUMERIC_10_2)
}

/// Valores de compra de vehículos, `NUMERIC(12, 2)`
pub fn validate_numeric_12_2(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative_up_to(value, MAX_NUMERIC_12_2)
}

pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)
}

fn validate_between(code: &'static str, value: &Decimal, bound: i64) -> Result<(), ValidationError> {
    let bound = Decimal::from(bound);
    if *value < -bound || *value > bound {
        let mut error = ValidationError::new(code);
        error.add_param("value".into(), value);
        error.add_param("min".into(), &-bound);
        error.add_param("max".into(), &bound);
        return Err(error);
    }
    Ok(())
}

pub fn validate_latitude(value: &Decimal) -> Result<(), ValidationError> {
    validate_between("latitude", value, 90)
}

pub fn validate_longitude(value: &Decimal) -> Result<(), ValidationError> {
    validate_between("longitude", value, 180)
}

/// Año de fabricación entre 1900 y el año siguiente al actual
pub fn validate_vehicle_year(value: i32) -> Result<(), ValidationError> {
    let max_year = Utc::now().year() + 1;
    if !(1900..=max_year).contains(&value) {
        let mut error = ValidationError::new("year");
        error.add_param("value".into(), &value);
        error.add_param("min".into(), &1900);
        error.add_param("max".into(), &max_year);
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Parsea un filtro de query string (`status=In Progress`) a su enum
pub fn parse_filter<T: FromStr>(field: &str, value: Option<&str>) -> Result<Option<T>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid value '{}' for filter '{}'", raw, field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::work_order::WorkOrderStatus;

    #[test]
    fn test_vin_regex() {
        assert!(VIN_REGEX.is_match("1HGCM82633A004352"));
        assert!(!VIN_REGEX.is_match("1HGCM82633A00435"));
        assert!(!VIN_REGEX.is_match("1HGCM82633A0043521"));
        assert!(!VIN_REGEX.is_match("1HGCM82633A00435-"));
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_latitude(&Decimal::new(4500, 2)).is_ok());
        assert!(validate_latitude(&Decimal::from(-90)).is_ok());
        assert!(validate_latitude(&Decimal::new(9001, 2)).is_err());
        assert!(validate_longitude(&Decimal::from(-180)).is_ok());
        assert!(validate_longitude(&Decimal::new(-18001, 2)).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
        assert!(validate_positive_decimal(&Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(-1).is_err());
        assert!(validate_numeric_10_2(&Decimal::ZERO).is_ok());
        assert!(validate_numeric_10_2(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_numeric_column_maximums() {
        assert_eq!(MAX_NUMERIC_5_2, Decimal::new(99_999, 2));
        assert_eq!(MAX_NUMERIC_8_2, Decimal::new(99_999_999, 2));
        assert_eq!(MAX_NUMERIC_10_2, Decimal::new(9_999_999_999, 2));
        assert_eq!(MAX_NUMERIC_12_2, Decimal::new(999_999_999_999, 2));
    }

    #[test]
    fn test_decimals_above_column_precision_are_rejected() {
        assert!(validate_numeric_8_2(&Decimal::new(99_999_999, 2)).is_ok());
        assert!(validate_numeric_8_2(&Decimal::new(100_000_000, 2)).is_err());
        assert!(validate_numeric_8_2(&Decimal::MAX).is_err());
        assert!(validate_numeric_5_2(&Decimal::new(100_000, 2)).is_err());
        assert!(validate_numeric_12_2(&Decimal::new(999_999_999_999, 2)).is_ok());
    }

    #[test]
    fn test_validate_vehicle_year() {
        assert!(validate_vehicle_year(1900).is_ok());
        assert!(validate_vehicle_year(Utc::now().year() + 1).is_ok());
        assert!(validate_vehicle_year(1899).is_err());
        assert!(validate_vehicle_year(Utc::now().year() + 2).is_err());
    }

    #[test]
    fn test_parse_filter() {
        let parsed: Option<WorkOrderStatus> = parse_filter("status", Some("On Hold")).unwrap();
        assert_eq!(parsed, Some(WorkOrderStatus::OnHold));
        let missing: Option<WorkOrderStatus> = parse_filter("status", None).unwrap();
        assert_eq!(missing, None);
        assert!(parse_filter::<WorkOrderStatus>("status", Some("Done")).is_err());
        assert!(validate_not_blank("  ").is_err());
    }
}
