//! Services module
//!
//! Lógica de negocio pura: no toca la base de datos, los repositorios la
//! invocan dentro de sus transacciones.

pub mod authorization_service;
pub mod fuel_economy_service;
pub mod inventory_service;
pub mod work_order_service;
