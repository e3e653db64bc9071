use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{PaginationParams, SortDirection};
use crate::models::part::WorkOrderPartDetail;
use crate::models::work_order::{NewWorkOrder, WorkOrder, WorkOrderPriority, WorkOrderType};
use crate::services::work_order_service::PartRequest;
use crate::utils::validation::{validate_not_blank, validate_numeric_10_2, validate_numeric_5_2};

/// Alta de una orden; el estado no se acepta, siempre nace `Pending`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkOrderRequest {
    pub vehicle_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub work_type: WorkOrderType,
    pub priority: WorkOrderPriority,
    #[validate(custom = "validate_not_blank")]
    pub description: String,
    #[validate(custom = "validate_numeric_10_2")]
    pub odometer_reading: Option<Decimal>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl From<CreateWorkOrderRequest> for NewWorkOrder {
    fn from(request: CreateWorkOrderRequest) -> Self {
        Self {
            vehicle_id: request.vehicle_id,
            technician_id: request.technician_id,
            vendor_id: request.vendor_id,
            work_type: request.work_type,
            priority: request.priority,
            description: request.description,
            odometer_reading: request.odometer_reading,
            scheduled_date: request.scheduled_date,
            notes: request.notes,
        }
    }
}

/// `PUT /work-orders/:id`; `status` pasa por las mismas reglas que el PATCH
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWorkOrderRequest {
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub work_type: Option<WorkOrderType>,
    pub status: Option<String>,
    pub priority: Option<WorkOrderPriority>,
    #[validate(custom = "validate_not_blank")]
    pub description: Option<String>,
    #[validate(custom = "validate_numeric_10_2")]
    pub odometer_reading: Option<Decimal>,
    #[validate(custom = "validate_numeric_5_2")]
    pub labor_hours: Option<Decimal>,
    #[validate(custom = "validate_numeric_10_2")]
    pub labor_cost: Option<Decimal>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl UpdateWorkOrderRequest {
    /// Aplica los campos editables (todo menos el estado y los costes derivados)
    pub fn apply_fields(&self, work_order: &mut WorkOrder) {
        if let Some(vehicle_id) = self.vehicle_id {
            work_order.vehicle_id = vehicle_id;
        }
        if self.technician_id.is_some() {
            work_order.technician_id = self.technician_id;
        }
        if self.vendor_id.is_some() {
            work_order.vendor_id = self.vendor_id;
        }
        if let Some(work_type) = self.work_type {
            work_order.work_type = work_type;
        }
        if let Some(priority) = self.priority {
            work_order.priority = priority;
        }
        if let Some(description) = &self.description {
            work_order.description = description.clone();
        }
        if self.odometer_reading.is_some() {
            work_order.odometer_reading = self.odometer_reading;
        }
        if let Some(labor_hours) = self.labor_hours {
            work_order.labor_hours = labor_hours;
        }
        if let Some(labor_cost) = self.labor_cost {
            work_order.labor_cost = labor_cost;
        }
        if self.scheduled_date.is_some() {
            work_order.scheduled_date = self.scheduled_date;
        }
        if self.notes.is_some() {
            work_order.notes = self.notes.clone();
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignTechnicianRequest {
    pub technician_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PartLineRequest {
    pub part_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddPartsRequest {
    #[validate]
    pub parts: Vec<PartLineRequest>,
}

impl AddPartsRequest {
    pub fn lines(&self) -> Vec<PartRequest> {
        self.parts
            .iter()
            .map(|line| PartRequest {
                part_id: line.part_id,
                quantity: line.quantity,
            })
            .collect()
    }
}

/// Orden con los repuestos consumidos
#[derive(Debug, Serialize)]
pub struct WorkOrderResponse {
    #[serde(flatten)]
    pub work_order: WorkOrder,
    pub parts: Vec<WorkOrderPartDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkOrderListQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub work_type: Option<WorkOrderType>,
    pub priority: Option<WorkOrderPriority>,
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl WorkOrderListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams { page: self.page, per_page: self.per_page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::work_order::fixtures::pending_work_order;
    use serde_json::json;

    #[test]
    fn test_create_ignores_caller_status() {
        let request: CreateWorkOrderRequest = serde_json::from_value(json!({
            "vehicle_id": Uuid::new_v4(),
            "type": "Repair",
            "priority": "High",
            "description": "Brake inspection",
            "status": "Completed"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        let draft = NewWorkOrder::from(request);
        let wo = WorkOrder::new("WO-2024-000007".to_string(), draft);
        assert_eq!(wo.status, crate::models::work_order::WorkOrderStatus::Pending);
    }

    #[test]
    fn test_blank_description_is_invalid() {
        let request: CreateWorkOrderRequest = serde_json::from_value(json!({
            "vehicle_id": Uuid::new_v4(),
            "type": "Inspection",
            "priority": "Low",
            "description": "   "
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_part_lines_require_positive_quantity() {
        let request: AddPartsRequest = serde_json::from_value(json!({
            "parts": [{ "part_id": Uuid::new_v4(), "quantity": 0 }]
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_rejects_negative_labor_cost() {
        let request: UpdateWorkOrderRequest =
            serde_json::from_value(json!({ "labor_cost": "-5.00" })).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_apply_fields_does_not_touch_derived_costs() {
        let mut wo = pending_work_order();
        let request: UpdateWorkOrderRequest =
            serde_json::from_value(json!({ "labor_cost": "80.00", "notes": "waiting on pads" })).unwrap();
        request.apply_fields(&mut wo);
        assert_eq!(wo.labor_cost, Decimal::new(8000, 2));
        assert_eq!(wo.total_cost, Decimal::ZERO);
        assert_eq!(wo.notes.as_deref(), Some("waiting on pads"));
    }
}
