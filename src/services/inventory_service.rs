//! Libro de inventario
//!
//! Operaciones de stock sobre un `Part` ya cargado (y bloqueado) por el
//! repositorio. Ninguna operación deja `quantity_in_stock` por debajo de cero;
//! si una operación falla, el repuesto queda intacto.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::part::Part;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Insufficient stock for part: {part_name}")]
    InsufficientStock {
        part_name: String,
        requested: i32,
        available: i32,
    },

    #[error("Stock adjustment must be a positive integer, got {0}")]
    NonPositiveAmount(i32),

    #[error("Stock level cannot be negative, got {0}")]
    NegativeStock(i32),

    #[error("Stock level would exceed the supported maximum")]
    StockOverflow,
}

/// Modo de ajuste manual de stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentMode {
    Increase,
    Decrease,
    Set,
}

/// Resultado de un movimiento de stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockMovement {
    pub old_stock: i32,
    pub new_stock: i32,
}

pub fn increase(part: &mut Part, amount: i32) -> Result<StockMovement, InventoryError> {
    if amount <= 0 {
        return Err(InventoryError::NonPositiveAmount(amount));
    }
    let old_stock = part.quantity_in_stock;
    let new_stock = old_stock
        .checked_add(amount)
        .ok_or(InventoryError::StockOverflow)?;
    part.quantity_in_stock = new_stock;
    Ok(StockMovement { old_stock, new_stock })
}

pub fn decrease(part: &mut Part, amount: i32) -> Result<StockMovement, InventoryError> {
    if amount <= 0 {
        return Err(InventoryError::NonPositiveAmount(amount));
    }
    let old_stock = part.quantity_in_stock;
    if amount > old_stock {
        return Err(InventoryError::InsufficientStock {
            part_name: part.name.clone(),
            requested: amount,
            available: old_stock,
        });
    }
    part.quantity_in_stock = old_stock - amount;
    Ok(StockMovement { old_stock, new_stock: part.quantity_in_stock })
}

pub fn set_absolute(part: &mut Part, value: i32) -> Result<StockMovement, InventoryError> {
    if value < 0 {
        return Err(InventoryError::NegativeStock(value));
    }
    let old_stock = part.quantity_in_stock;
    part.quantity_in_stock = value;
    Ok(StockMovement { old_stock, new_stock: value })
}

/// Despacha un ajuste manual (`POST /parts/:id/adjust-stock`)
pub fn adjust(part: &mut Part, amount: i32, mode: AdjustmentMode) -> Result<StockMovement, InventoryError> {
    match mode {
        AdjustmentMode::Increase => increase(part, amount),
        AdjustmentMode::Decrease => decrease(part, amount),
        AdjustmentMode::Set => set_absolute(part, amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::part::fixtures::part;
    use rust_decimal::Decimal;

    #[test]
    fn test_increase_and_decrease_track_old_and_new() {
        let mut p = part("Oil Filter", 5, 2, Decimal::new(1000, 2));
        assert_eq!(increase(&mut p, 3), Ok(StockMovement { old_stock: 5, new_stock: 8 }));
        assert_eq!(decrease(&mut p, 8), Ok(StockMovement { old_stock: 8, new_stock: 0 }));
        assert_eq!(p.quantity_in_stock, 0);
    }

    #[test]
    fn test_decrease_beyond_stock_is_rejected_and_state_unchanged() {
        let mut p = part("Brake Pad", 5, 2, Decimal::new(4500, 2));
        let err = decrease(&mut p, 10).unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                part_name: "Brake Pad".to_string(),
                requested: 10,
                available: 5,
            }
        );
        assert_eq!(p.quantity_in_stock, 5);
    }

    #[test]
    fn test_amounts_must_be_positive() {
        let mut p = part("Spark Plug", 5, 2, Decimal::ONE);
        assert_eq!(increase(&mut p, 0), Err(InventoryError::NonPositiveAmount(0)));
        assert_eq!(decrease(&mut p, -2), Err(InventoryError::NonPositiveAmount(-2)));
        assert_eq!(p.quantity_in_stock, 5);
    }

    #[test]
    fn test_set_absolute_requires_non_negative() {
        let mut p = part("Coolant", 7, 2, Decimal::ONE);
        assert_eq!(set_absolute(&mut p, 0), Ok(StockMovement { old_stock: 7, new_stock: 0 }));
        assert_eq!(set_absolute(&mut p, -1), Err(InventoryError::NegativeStock(-1)));
        assert_eq!(p.quantity_in_stock, 0);
    }

    #[test]
    fn test_any_sequence_keeps_stock_non_negative() {
        let mut p = part("Fuse", 3, 1, Decimal::ONE);
        let ops: [(AdjustmentMode, i32); 7] = [
            (AdjustmentMode::Decrease, 2),
            (AdjustmentMode::Decrease, 2),
            (AdjustmentMode::Increase, 4),
            (AdjustmentMode::Decrease, 6),
            (AdjustmentMode::Decrease, 5),
            (AdjustmentMode::Increase, 1),
            (AdjustmentMode::Decrease, 1),
        ];
        for (mode, amount) in ops {
            let _ = adjust(&mut p, amount, mode);
            assert!(p.quantity_in_stock >= 0);
        }
        assert_eq!(p.quantity_in_stock, 0);
    }

    #[test]
    fn test_increase_overflow_is_rejected() {
        let mut p = part("Washer", i32::MAX, 1, Decimal::ONE);
        assert_eq!(increase(&mut p, 1), Err(InventoryError::StockOverflow));
        assert_eq!(p.quantity_in_stock, i32::MAX);
    }

    #[test]
    fn test_adjustment_mode_deserializes_lowercase() {
        let mode: AdjustmentMode = serde_json::from_str("\"set\"").unwrap();
        assert_eq!(mode, AdjustmentMode::Set);
    }
}
