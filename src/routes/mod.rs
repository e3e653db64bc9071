pub mod auth_routes;
pub mod driver_routes;
pub mod fuel_log_routes;
pub mod part_routes;
pub mod user_routes;
pub mod vehicle_routes;
pub mod vendor_routes;
pub mod work_order_routes;
