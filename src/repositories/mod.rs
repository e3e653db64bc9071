pub mod driver_repository;
pub mod fuel_log_repository;
pub mod part_repository;
pub mod user_repository;
pub mod vehicle_repository;
pub mod vendor_repository;
pub mod work_order_repository;
