use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::common_dto::{PaginationParams, SortDirection};
use crate::models::part::{Part, StockStatus};
use crate::services::inventory_service::{self, AdjustmentMode, InventoryError};
use crate::utils::validation::validate_numeric_10_2;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePartRequest {
    #[validate(length(min = 1, max = 100))]
    pub part_number: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    #[validate(range(min = 0))]
    pub quantity_in_stock: i32,
    #[validate(range(min = 0))]
    pub minimum_stock_level: i32,
    #[validate(custom = "validate_numeric_10_2")]
    pub unit_price: Decimal,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePartRequest {
    #[validate(length(min = 1, max = 100))]
    pub part_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    #[validate(range(min = 0))]
    pub quantity_in_stock: Option<i32>,
    #[validate(range(min = 0))]
    pub minimum_stock_level: Option<i32>,
    #[validate(custom = "validate_numeric_10_2")]
    pub unit_price: Option<Decimal>,
    pub location: Option<String>,
}

impl UpdatePartRequest {
    /// Aplica los campos presentes sobre el repuesto ya bloqueado; el stock
    /// solo cambia si viene en la petición y pasa por `set_absolute`
    pub fn apply_to(self, part: &mut Part) -> Result<(), InventoryError> {
        if let Some(quantity) = self.quantity_in_stock {
            inventory_service::set_absolute(part, quantity)?;
        }
        if let Some(part_number) = self.part_number {
            part.part_number = part_number;
        }
        if let Some(name) = self.name {
            part.name = name;
        }
        if self.description.is_some() {
            part.description = self.description;
        }
        if self.category.is_some() {
            part.category = self.category;
        }
        if self.manufacturer.is_some() {
            part.manufacturer = self.manufacturer;
        }
        if let Some(minimum) = self.minimum_stock_level {
            part.minimum_stock_level = minimum;
        }
        if let Some(unit_price) = self.unit_price {
            part.unit_price = unit_price;
        }
        if self.location.is_some() {
            part.location = self.location;
        }
        Ok(())
    }
}

/// `POST /parts/:id/adjust-stock`
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockRequest {
    pub adjustment: i32,
    #[serde(rename = "type")]
    pub mode: AdjustmentMode,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdjustStockResponse {
    pub old_stock: i32,
    pub new_stock: i32,
    pub part: PartResponse,
}

/// Repuesto con su clasificación de stock
#[derive(Debug, Serialize)]
pub struct PartResponse {
    #[serde(flatten)]
    pub part: Part,
    pub stock_status: StockStatus,
}

impl From<Part> for PartResponse {
    fn from(part: Part) -> Self {
        let stock_status = part.stock_status();
        Self { part, stock_status }
    }
}

/// Detalle con las órdenes que lo han consumido
#[derive(Debug, Serialize)]
pub struct PartDetailResponse {
    #[serde(flatten)]
    pub part: PartResponse,
    pub work_orders: Vec<PartUsage>,
}

/// Uso de un repuesto en una orden
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PartUsage {
    pub work_order_id: uuid::Uuid,
    pub work_order_number: String,
    pub quantity_used: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub attached_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub low_stock: bool,
    pub sort_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PartListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams { page: self.page, per_page: self.per_page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::part::fixtures::part;
    use serde_json::json;

    #[test]
    fn test_part_response_includes_stock_status() {
        let response = PartResponse::from(part("Oil Filter", 2, 5, Decimal::new(1000, 2)));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["stock_status"], "Low Stock");
        assert_eq!(value["name"], "Oil Filter");
    }

    #[test]
    fn test_adjust_stock_request_uses_type_field() {
        let request: AdjustStockRequest =
            serde_json::from_value(json!({ "adjustment": 4, "type": "increase" })).unwrap();
        assert_eq!(request.mode, AdjustmentMode::Increase);
        assert!(serde_json::from_value::<AdjustStockRequest>(json!({ "adjustment": 4, "type": "double" })).is_err());
    }

    #[test]
    fn test_negative_stock_on_create_is_invalid() {
        let request: CreatePartRequest = serde_json::from_value(json!({
            "part_number": "OF-100",
            "name": "Oil Filter",
            "quantity_in_stock": -1,
            "minimum_stock_level": 5,
            "unit_price": "10.00"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_apply_update_keeps_missing_fields() {
        let mut p = part("Oil Filter", 2, 5, Decimal::new(1000, 2));
        UpdatePartRequest {
            part_number: None,
            name: Some("Oil Filter XL".to_string()),
            description: None,
            category: None,
            manufacturer: None,
            quantity_in_stock: None,
            minimum_stock_level: Some(3),
            unit_price: None,
            location: None,
        }
        .apply_to(&mut p)
        .unwrap();
        assert_eq!(p.name, "Oil Filter XL");
        assert_eq!(p.minimum_stock_level, 3);
        assert_eq!(p.quantity_in_stock, 2);
        assert_eq!(p.category.as_deref(), Some("Filters"));
    }

    #[test]
    fn test_apply_update_sets_stock_only_when_requested() {
        let mut p = part("Brake Pad", 7, 2, Decimal::new(2500, 2));
        let rename: UpdatePartRequest = serde_json::from_value(json!({ "name": "Brake Pad Set" })).unwrap();
        rename.apply_to(&mut p).unwrap();
        assert_eq!(p.quantity_in_stock, 7);

        let restock: UpdatePartRequest = serde_json::from_value(json!({ "quantity_in_stock": 12 })).unwrap();
        restock.apply_to(&mut p).unwrap();
        assert_eq!(p.quantity_in_stock, 12);

        let negative: UpdatePartRequest =
            serde_json::from_value(json!({ "quantity_in_stock": -1, "name": "Broken" })).unwrap();
        assert_eq!(negative.apply_to(&mut p), Err(InventoryError::NegativeStock(-1)));
        assert_eq!(p.quantity_in_stock, 12);
        assert_eq!(p.name, "Brake Pad Set");
    }
}
