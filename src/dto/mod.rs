//! DTOs de entrada/salida de la API

pub mod auth_dto;
pub mod common_dto;
pub mod driver_dto;
pub mod fuel_log_dto;
pub mod part_dto;
pub mod vehicle_dto;
pub mod vendor_dto;
pub mod work_order_dto;

pub use common_dto::{ApiResponse, Paginated, PaginationParams, SortDirection};
