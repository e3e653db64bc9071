//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::services::fuel_economy_service::FuelEconomyError;
use crate::services::inventory_service::InventoryError;
use crate::services::work_order_service::ReconcileError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Insufficient stock for part: {part_name}")]
    InsufficientStock {
        part_name: String,
        requested: i32,
        available: i32,
    },

    #[error("Part with id '{0}' not found")]
    PartNotFound(Uuid),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, details: Option<serde_json::Value>, code: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message,
            details,
            code: Some(code.to_string()),
        }
    }
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::InsufficientStock { .. }
            | AppError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::PartNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Database(e) => {
                tracing::error!("❌ Database error: {}", e);
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    Some(json!({ "sql_error": e.to_string() })),
                    "DB_ERROR",
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("⚠️ Validation error: {}", e);
                ErrorResponse::new(
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    Some(json!(e)),
                    "VALIDATION_ERROR",
                )
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!("🔒 Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, None, "UNAUTHORIZED")
            }

            AppError::Forbidden(msg) => {
                tracing::warn!("🚫 Forbidden access: {}", msg);
                ErrorResponse::new("Forbidden", msg, None, "FORBIDDEN")
            }

            AppError::NotFound(msg) => {
                tracing::debug!("🔍 Resource not found: {}", msg);
                ErrorResponse::new("Not Found", msg, None, "NOT_FOUND")
            }

            AppError::Conflict(msg) => {
                tracing::warn!("⚠️ Conflict: {}", msg);
                ErrorResponse::new("Conflict", msg, None, "CONFLICT")
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("⚠️ Bad request: {}", msg);
                ErrorResponse::new("Bad Request", msg, None, "BAD_REQUEST")
            }

            AppError::Internal(msg) => {
                tracing::error!("❌ Internal error: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    Some(json!({ "internal_error": msg })),
                    "INTERNAL_ERROR",
                )
            }

            AppError::Jwt(msg) => {
                tracing::warn!("🔒 JWT error: {}", msg);
                ErrorResponse::new("JWT Error", msg, None, "JWT_ERROR")
            }

            AppError::Hash(msg) => {
                tracing::error!("❌ Hash error: {}", msg);
                ErrorResponse::new(
                    "Hash Error",
                    "An error occurred while processing credentials".to_string(),
                    Some(json!({ "hash_error": msg })),
                    "HASH_ERROR",
                )
            }

            AppError::InsufficientStock { part_name, requested, available } => {
                tracing::warn!(
                    "📦 Stock insuficiente para '{}': solicitado {}, disponible {}",
                    part_name, requested, available
                );
                ErrorResponse::new(
                    "Insufficient Stock",
                    format!("Insufficient stock for part: {}", part_name),
                    Some(json!({
                        "part": part_name,
                        "requested": requested,
                        "available": available,
                    })),
                    "INSUFFICIENT_STOCK",
                )
            }

            AppError::PartNotFound(id) => {
                tracing::debug!("🔍 Part not found: {}", id);
                ErrorResponse::new(
                    "Not Found",
                    format!("Part with id '{}' not found", id),
                    Some(json!({ "part_id": id })),
                    "PART_NOT_FOUND",
                )
            }

            AppError::InvalidStatus(value) => {
                tracing::warn!("⚠️ Invalid status: {}", value);
                ErrorResponse::new(
                    "Invalid Status",
                    format!("'{}' is not a valid status", value),
                    None,
                    "INVALID_STATUS",
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InsufficientStock { part_name, requested, available } => {
                AppError::InsufficientStock { part_name, requested, available }
            }
            InventoryError::NonPositiveAmount(_)
            | InventoryError::NegativeStock(_)
            | InventoryError::StockOverflow => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::PartNotFound(id) => AppError::PartNotFound(id),
            ReconcileError::Inventory(e) => e.into(),
            ReconcileError::CostOutOfRange => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<FuelEconomyError> for AppError {
    fn from(err: FuelEconomyError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("field".into(), &field);
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Convierte violaciones de índice único en `Conflict`, el resto queda como error de base de datos
pub fn map_unique_violation(err: sqlx::Error, conflict_message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(conflict_message.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_client_errors() {
        let insufficient = AppError::InsufficientStock {
            part_name: "Oil Filter".to_string(),
            requested: 10,
            available: 5,
        };
        assert_eq!(insufficient.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(insufficient.to_string(), "Insufficient stock for part: Oil Filter");

        assert_eq!(AppError::PartNotFound(Uuid::nil()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidStatus("Done".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_inventory_error_conversion() {
        let err: AppError = InventoryError::InsufficientStock {
            part_name: "Brake Pad".to_string(),
            requested: 3,
            available: 1,
        }
        .into();
        assert!(matches!(err, AppError::InsufficientStock { requested: 3, available: 1, .. }));

        let err: AppError = InventoryError::NonPositiveAmount(0).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_out_of_range_costs_are_bad_requests() {
        let err: AppError = ReconcileError::CostOutOfRange.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: AppError = FuelEconomyError::TotalCostOutOfRange.into();
        assert!(matches!(&err, AppError::BadRequest(msg) if msg == "Fuel total cost is out of range"));
    }

    #[test]
    fn test_validation_error_helper() {
        let err = validation_error("parts", "at least one part is required");
        match err {
            AppError::Validation(errors) => assert!(errors.field_errors().contains_key("parts")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
