//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`.

pub mod auth;
pub mod driver;
pub mod fuel_log;
pub mod part;
pub mod user;
pub mod vehicle;
pub mod vendor;
pub mod work_order;
