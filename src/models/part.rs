//! Modelo de Part
//!
//! Repuestos del inventario. El stock nunca baja de cero; el estado de stock
//! se calcula al leer, no se guarda.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Part - mapea exactamente a la tabla parts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Part {
    pub id: Uuid,
    pub part_number: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub quantity_in_stock: i32,
    pub minimum_stock_level: i32,
    pub unit_price: Decimal,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Clasificación del stock de un repuesto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

impl Part {
    pub fn stock_status(&self) -> StockStatus {
        if self.quantity_in_stock == 0 {
            StockStatus::OutOfStock
        } else if self.quantity_in_stock <= self.minimum_stock_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity_in_stock <= self.minimum_stock_level
    }
}

/// Fila de la tabla work_order_parts: precio congelado en el momento de asignar
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkOrderPart {
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub part_id: Uuid,
    pub quantity_used: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repuesto usado en una orden con los datos del catálogo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkOrderPartDetail {
    pub part_id: Uuid,
    pub part_number: String,
    pub name: String,
    pub quantity_used: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub attached_at: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn part(name: &str, quantity_in_stock: i32, minimum_stock_level: i32, unit_price: Decimal) -> Part {
        let now = Utc::now();
        Part {
            id: Uuid::new_v4(),
            part_number: format!("PN-{}", name.to_uppercase().replace(' ', "-")),
            name: name.to_string(),
            description: None,
            category: Some("Filters".to_string()),
            manufacturer: None,
            quantity_in_stock,
            minimum_stock_level,
            unit_price,
            location: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::part;
    use super::*;

    #[test]
    fn test_stock_status_classification() {
        assert_eq!(part("Oil Filter", 0, 5, Decimal::ONE).stock_status(), StockStatus::OutOfStock);
        assert_eq!(part("Oil Filter", 5, 5, Decimal::ONE).stock_status(), StockStatus::LowStock);
        assert_eq!(part("Oil Filter", 1, 5, Decimal::ONE).stock_status(), StockStatus::LowStock);
        assert_eq!(part("Oil Filter", 6, 5, Decimal::ONE).stock_status(), StockStatus::InStock);
    }

    #[test]
    fn test_zero_minimum_is_only_low_when_empty() {
        let p = part("Wiper", 0, 0, Decimal::ONE);
        assert_eq!(p.stock_status(), StockStatus::OutOfStock);
        assert!(p.is_low_stock());
        assert_eq!(part("Wiper", 1, 0, Decimal::ONE).stock_status(), StockStatus::InStock);
    }
}
