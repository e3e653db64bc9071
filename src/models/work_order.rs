//! Modelo de WorkOrder
//!
//! Orden de mantenimiento sobre un vehículo. `total_cost` siempre es
//! `labor_cost + parts_cost`; nunca se asigna directamente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Estado de la orden - mapea al ENUM work_order_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "work_order_status")]
pub enum WorkOrderStatus {
    #[sqlx(rename = "Pending")]
    #[serde(rename = "Pending")]
    Pending,
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    #[sqlx(rename = "On Hold")]
    #[serde(rename = "On Hold")]
    OnHold,
    #[sqlx(rename = "Completed")]
    #[serde(rename = "Completed")]
    Completed,
    #[sqlx(rename = "Cancelled")]
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl WorkOrderStatus {
    pub const ALL: [WorkOrderStatus; 5] = [
        WorkOrderStatus::Pending,
        WorkOrderStatus::InProgress,
        WorkOrderStatus::OnHold,
        WorkOrderStatus::Completed,
        WorkOrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Pending => "Pending",
            WorkOrderStatus::InProgress => "In Progress",
            WorkOrderStatus::OnHold => "On Hold",
            WorkOrderStatus::Completed => "Completed",
            WorkOrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for WorkOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkOrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de trabajo - mapea al ENUM work_order_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "work_order_type")]
pub enum WorkOrderType {
    Preventative,
    Repair,
    Inspection,
    Emergency,
}

/// Prioridad - mapea al ENUM work_order_priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "work_order_priority")]
pub enum WorkOrderPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// WorkOrder - mapea exactamente a la tabla work_orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkOrder {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub work_order_number: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub work_type: WorkOrderType,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    pub description: String,
    pub odometer_reading: Option<Decimal>,
    pub labor_hours: Decimal,
    pub labor_cost: Decimal,
    pub parts_cost: Decimal,
    pub total_cost: Decimal,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub downtime_hours: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Datos de alta de una orden; el estado inicial no es configurable
#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub vehicle_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub work_type: WorkOrderType,
    pub priority: WorkOrderPriority,
    pub description: String,
    pub odometer_reading: Option<Decimal>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl WorkOrder {
    /// Toda orden nace en `Pending` y sin costes
    pub fn new(work_order_number: String, draft: NewWorkOrder) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            vehicle_id: draft.vehicle_id,
            technician_id: draft.technician_id,
            vendor_id: draft.vendor_id,
            work_order_number,
            work_type: draft.work_type,
            status: WorkOrderStatus::Pending,
            priority: draft.priority,
            description: draft.description,
            odometer_reading: draft.odometer_reading,
            labor_hours: Decimal::ZERO,
            labor_cost: Decimal::ZERO,
            parts_cost: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            scheduled_date: draft.scheduled_date,
            started_at: None,
            completed_at: None,
            downtime_hours: 0,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn pending_work_order() -> WorkOrder {
        WorkOrder::new(
            "WO-2024-000001".to_string(),
            NewWorkOrder {
                vehicle_id: Uuid::new_v4(),
                technician_id: None,
                vendor_id: None,
                work_type: WorkOrderType::Repair,
                priority: WorkOrderPriority::Medium,
                description: "Replace brake pads".to_string(),
                odometer_reading: None,
                scheduled_date: None,
                notes: None,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_work_order_is_pending_with_zero_costs() {
        let wo = fixtures::pending_work_order();
        assert_eq!(wo.status, WorkOrderStatus::Pending);
        assert_eq!(wo.total_cost, Decimal::ZERO);
        assert!(wo.started_at.is_none());
    }

    #[test]
    fn test_status_parsing_uses_display_names() {
        assert_eq!("In Progress".parse::<WorkOrderStatus>(), Ok(WorkOrderStatus::InProgress));
        assert_eq!("On Hold".parse::<WorkOrderStatus>(), Ok(WorkOrderStatus::OnHold));
        assert!("InProgress".parse::<WorkOrderStatus>().is_err());
    }

    #[test]
    fn test_work_type_serializes_as_type() {
        let json = serde_json::to_value(fixtures::pending_work_order()).unwrap();
        assert_eq!(json["type"], "Repair");
        assert_eq!(json["status"], "Pending");
    }
}
