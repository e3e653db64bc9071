//! Fleet Maintenance API
//!
//! Backend REST para gestión de flota: vehículos, órdenes de trabajo,
//! inventario de repuestos, repostajes, proveedores y usuarios con roles.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth_middleware, cors_for};
use crate::routes::{
    auth_routes, driver_routes, fuel_log_routes, part_routes, user_routes, vehicle_routes, vendor_routes,
    work_order_routes,
};
use crate::state::AppState;

/// Construye el router completo bajo `/api`
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_routes::create_session_router())
        .merge(user_routes::create_user_router())
        .merge(vehicle_routes::create_vehicle_router())
        .merge(work_order_routes::create_work_order_router())
        .merge(part_routes::create_part_router())
        .merge(fuel_log_routes::create_fuel_log_router())
        .merge(vendor_routes::create_vendor_router())
        .merge(driver_routes::create_driver_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes::create_public_auth_router())
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_for(&state.config)),
        )
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "ok",
        "service": "fleet-maintenance-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
