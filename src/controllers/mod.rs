pub mod auth_controller;
pub mod driver_controller;
pub mod fuel_log_controller;
pub mod part_controller;
pub mod user_controller;
pub mod vehicle_controller;
pub mod vendor_controller;
pub mod work_order_controller;
