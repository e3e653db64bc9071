//! Reconciliación de órdenes de trabajo
//!
//! Lógica pura sobre `WorkOrder` y `Part` ya cargados: consumo de repuestos
//! contra inventario, acumulación de costes y efectos de los cambios de
//! estado. La persistencia (y la transacción que hace todo esto atómico)
//! vive en `WorkOrderRepository`.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::part::Part;
use crate::models::work_order::{WorkOrder, WorkOrderStatus};
use crate::services::inventory_service::{self, InventoryError};
use crate::utils::validation::MAX_NUMERIC_10_2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Part with id '{0}' not found")]
    PartNotFound(Uuid),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Work order cost is out of range")]
    CostOutOfRange,
}

/// Línea solicitada en `add-parts`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRequest {
    pub part_id: Uuid,
    pub quantity: i32,
}

/// Línea ya valorada, lista para insertarse en work_order_parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedPart {
    pub part_id: Uuid,
    pub quantity_used: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Resultado de aplicar un cambio de estado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: WorkOrderStatus,
    pub current: WorkOrderStatus,
    pub started: bool,
    pub completed: bool,
}

/// `WO-<año>-<secuencia de 6 dígitos>`
pub fn format_work_order_number(created_at: DateTime<Utc>, sequence: i64) -> String {
    format!("WO-{}-{:06}", created_at.year(), sequence)
}

/// Costes de la orden y de sus líneas viven en columnas `NUMERIC(10, 2)`
fn bounded(value: Option<Decimal>) -> Result<Decimal, ReconcileError> {
    value
        .filter(|v| *v <= MAX_NUMERIC_10_2)
        .ok_or(ReconcileError::CostOutOfRange)
}

/// `total_cost = labor_cost + parts_cost`; idempotente
pub fn calculate_total_cost(work_order: &mut WorkOrder) -> Result<(), ReconcileError> {
    work_order.total_cost = bounded(work_order.labor_cost.checked_add(work_order.parts_cost))?;
    Ok(())
}

/// Horas completas transcurridas, truncando
pub fn whole_hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    let hours = (end - start).num_hours();
    hours.clamp(0, i32::MAX as i64) as i32
}

/// Consume repuestos para una orden.
///
/// Todas las líneas se validan y aplican sobre copias; `parts` y
/// `work_order` solo se modifican si el lote entero es válido. Líneas
/// repetidas del mismo repuesto consumen del stock ya descontado.
pub fn attach_parts(
    work_order: &mut WorkOrder,
    parts: &mut HashMap<Uuid, Part>,
    lines: &[PartRequest],
) -> Result<Vec<AttachedPart>, ReconcileError> {
    let mut staged: HashMap<Uuid, Part> = HashMap::new();
    let mut attached = Vec::with_capacity(lines.len());

    for line in lines {
        let part = match staged.entry(line.part_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let original = parts
                    .get(&line.part_id)
                    .ok_or(ReconcileError::PartNotFound(line.part_id))?;
                entry.insert(original.clone())
            }
        };

        // Precio congelado al momento de asignar, no el precio vivo del catálogo
        let unit_price = part.unit_price;
        inventory_service::decrease(part, line.quantity)?;

        attached.push(AttachedPart {
            part_id: line.part_id,
            quantity_used: line.quantity,
            unit_price,
            total_price: bounded(unit_price.checked_mul(Decimal::from(line.quantity)))?,
        });
    }

    let parts_cost = attached
        .iter()
        .try_fold(work_order.parts_cost, |acc, line| bounded(acc.checked_add(line.total_price)))?;
    let total_cost = bounded(work_order.labor_cost.checked_add(parts_cost))?;

    work_order.parts_cost = parts_cost;
    work_order.total_cost = total_cost;
    parts.extend(staged);

    Ok(attached)
}

/// Aplica un nuevo estado y sus efectos: `started_at` al entrar en
/// `In Progress` (solo si no estaba fijado) y `completed_at` + `downtime_hours`
/// al entrar en `Completed`. Cualquier transición entre estados es válida.
pub fn apply_status(
    work_order: &mut WorkOrder,
    new_status: WorkOrderStatus,
    now: DateTime<Utc>,
) -> StatusChange {
    let previous = work_order.status;
    let mut change = StatusChange {
        previous,
        current: new_status,
        started: false,
        completed: false,
    };

    if previous != new_status {
        match new_status {
            WorkOrderStatus::InProgress if work_order.started_at.is_none() => {
                work_order.started_at = Some(now);
                change.started = true;
            }
            WorkOrderStatus::Completed => {
                work_order.completed_at = Some(now);
                if let Some(started_at) = work_order.started_at {
                    work_order.downtime_hours = whole_hours_between(started_at, now);
                }
                change.completed = true;
            }
            _ => {}
        }
    }

    work_order.status = new_status;
    change
}

/// Parsea un estado recibido como texto
pub fn parse_status(value: &str) -> Result<WorkOrderStatus, crate::utils::errors::AppError> {
    value
        .parse::<WorkOrderStatus>()
        .map_err(crate::utils::errors::AppError::InvalidStatus)
}
