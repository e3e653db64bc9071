//! Tests contra PostgreSQL real.
//!
//! Solo corren si `DATABASE_URL` apunta a una base de datos desechable;
//! sin ella cada test termina sin hacer nada.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use fleet_maintenance::controllers::driver_controller::DriverController;
use fleet_maintenance::database::run_migrations;
use fleet_maintenance::dto::driver_dto::CreateDriverRequest;
use fleet_maintenance::dto::fuel_log_dto::CreateFuelLogRequest;
use fleet_maintenance::dto::part_dto::{CreatePartRequest, UpdatePartRequest};
use fleet_maintenance::dto::vehicle_dto::CreateVehicleRequest;
use fleet_maintenance::models::auth::UserRole;
use fleet_maintenance::models::driver::LicenseExpiryStatus;
use fleet_maintenance::models::fuel_log::FuelLog;
use fleet_maintenance::models::part::Part;
use fleet_maintenance::models::user::User;
use fleet_maintenance::models::vehicle::Vehicle;
use fleet_maintenance::models::work_order::{NewWorkOrder, WorkOrder, WorkOrderPriority, WorkOrderType};
use fleet_maintenance::repositories::driver_repository::DriverRepository;
use fleet_maintenance::repositories::fuel_log_repository::FuelLogRepository;
use fleet_maintenance::repositories::part_repository::PartRepository;
use fleet_maintenance::repositories::user_repository::UserRepository;
use fleet_maintenance::repositories::vehicle_repository::VehicleRepository;
use fleet_maintenance::repositories::work_order_repository::WorkOrderRepository;
use fleet_maintenance::services::inventory_service::AdjustmentMode;
use fleet_maintenance::services::work_order_service::PartRequest;
use fleet_maintenance::utils::errors::AppError;

async fn test_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())?;
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&url)
        .await
        .expect("DATABASE_URL is set but the database is unreachable");
    run_migrations(&pool).await.expect("migrations should apply");
    Some(pool)
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

async fn create_vehicle(pool: &PgPool) -> Vehicle {
    let vin = Uuid::new_v4().simple().to_string()[..17].to_uppercase();
    let request: CreateVehicleRequest = serde_json::from_value(json!({
        "vin": vin,
        "plate_number": unique("T")[..14].to_string(),
        "year": 2021,
        "make": "Ford",
        "model": "Transit",
        "fuel_type": "Diesel",
        "status": "Active"
    }))
    .unwrap();
    VehicleRepository::new(pool.clone()).create(request).await.unwrap()
}

async fn create_part(pool: &PgPool, stock: i32, unit_price: &str) -> Part {
    let request: CreatePartRequest = serde_json::from_value(json!({
        "part_number": unique("PN"),
        "name": "Brake Pad",
        "quantity_in_stock": stock,
        "minimum_stock_level": 1,
        "unit_price": unit_price
    }))
    .unwrap();
    PartRepository::new(pool.clone()).create(request).await.unwrap()
}

async fn create_work_order(pool: &PgPool, vehicle: &Vehicle) -> WorkOrder {
    WorkOrderRepository::new(pool.clone())
        .create(NewWorkOrder {
            vehicle_id: vehicle.id,
            technician_id: None,
            vendor_id: None,
            work_type: WorkOrderType::Repair,
            priority: WorkOrderPriority::High,
            description: "Replace brake pads".to_string(),
            odometer_reading: None,
            scheduled_date: None,
            notes: None,
        })
        .await
        .unwrap()
}

fn fuel_log(vehicle: &Vehicle, date: &str, odometer: i64, quantity: &str) -> FuelLog {
    let request: CreateFuelLogRequest = serde_json::from_value(json!({
        "vehicle_id": vehicle.id,
        "date": date,
        "odometer": odometer,
        "quantity": quantity,
        "unit": "Liters",
        "cost_per_unit": "1.50",
        "tank_filled": true
    }))
    .unwrap();
    request.into_fuel_log(None)
}

async fn stock_of(pool: &PgPool, part_id: Uuid) -> i32 {
    PartRepository::new(pool.clone())
        .find_by_id(part_id)
        .await
        .unwrap()
        .unwrap()
        .quantity_in_stock
}

#[tokio::test]
async fn test_add_parts_rolls_back_when_a_later_line_fails() {
    let Some(pool) = test_pool().await else { return };
    let vehicle = create_vehicle(&pool).await;
    let work_order = create_work_order(&pool, &vehicle).await;
    let plenty = create_part(&pool, 10, "25.00").await;
    let scarce = create_part(&pool, 1, "80.00").await;

    let repository = WorkOrderRepository::new(pool.clone());
    let result = repository
        .add_parts(
            work_order.id,
            &[
                PartRequest { part_id: plenty.id, quantity: 3 },
                PartRequest { part_id: scarce.id, quantity: 5 },
            ],
        )
        .await;

    assert!(matches!(result, Err(AppError::InsufficientStock { available: 1, .. })));
    assert_eq!(stock_of(&pool, plenty.id).await, 10);
    assert_eq!(stock_of(&pool, scarce.id).await, 1);
    assert!(repository.parts_for(work_order.id).await.unwrap().is_empty());

    let unchanged = repository.find_by_id(work_order.id).await.unwrap().unwrap();
    assert_eq!(unchanged.parts_cost, Decimal::ZERO);
    assert_eq!(unchanged.total_cost, Decimal::ZERO);
}

#[tokio::test]
async fn test_concurrent_add_parts_never_oversells() {
    let Some(pool) = test_pool().await else { return };
    let vehicle = create_vehicle(&pool).await;
    let part = create_part(&pool, 5, "10.00").await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let work_order = create_work_order(&pool, &vehicle).await;
        let pool = pool.clone();
        let part_id = part.id;
        handles.push(tokio::spawn(async move {
            WorkOrderRepository::new(pool)
                .add_parts(work_order.id, &[PartRequest { part_id, quantity: 1 }])
                .await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(err) => assert!(matches!(err, AppError::InsufficientStock { .. })),
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(stock_of(&pool, part.id).await, 0);
}

#[tokio::test]
async fn test_work_order_numbers_follow_the_sequence() {
    let Some(pool) = test_pool().await else { return };
    let vehicle = create_vehicle(&pool).await;
    let prefix = format!("WO-{}-", Utc::now().year());

    let mut previous = 0u64;
    for _ in 0..3 {
        let work_order = create_work_order(&pool, &vehicle).await;
        let suffix = work_order
            .work_order_number
            .strip_prefix(&prefix)
            .expect("number carries the current year");
        assert!(suffix.len() >= 6);
        let sequence: u64 = suffix.parse().unwrap();
        assert!(sequence > previous);
        previous = sequence;
    }
}

#[tokio::test]
async fn test_previous_fillup_breaks_date_ties_by_creation_time() {
    let Some(pool) = test_pool().await else { return };
    let vehicle = create_vehicle(&pool).await;
    let repository = FuelLogRepository::new(pool.clone());

    let mut older = fuel_log(&vehicle, "2024-05-01", 1000, "40");
    older.created_at = Utc::now() - Duration::minutes(10);
    let older = repository.create(older).await.unwrap();

    let mut newer = fuel_log(&vehicle, "2024-05-01", 1100, "40");
    newer.created_at = Utc::now() - Duration::minutes(5);
    let newer = repository.create(newer).await.unwrap();

    let next = repository.create(fuel_log(&vehicle, "2024-05-08", 1400, "50")).await.unwrap();
    assert_eq!(next.fuel_economy, Some(Decimal::new(600, 2)));
    assert_eq!(next.total_cost, Decimal::new(7500, 2));

    // El propio registro nunca es su llenado anterior
    let day_after = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let baseline = repository
        .find_previous_fillup(vehicle.id, day_after, newer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(baseline.id, older.id);
}

#[tokio::test]
async fn test_part_edits_do_not_undo_concurrent_stock_changes() {
    let Some(pool) = test_pool().await else { return };
    let part = create_part(&pool, 10, "12.00").await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let pool = pool.clone();
        let part_id = part.id;
        handles.push(tokio::spawn(async move {
            let repository = PartRepository::new(pool);
            repository
                .adjust_stock(part_id, 1, AdjustmentMode::Decrease)
                .await
                .unwrap();

            let rename: UpdatePartRequest =
                serde_json::from_value(json!({ "name": format!("Brake Pad rev {}", i) })).unwrap();
            repository
                .update_with(part_id, |part| rename.apply_to(part).map_err(AppError::from))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(stock_of(&pool, part.id).await, 0);
}

#[tokio::test]
async fn test_updating_soft_deleted_rows_is_not_found() {
    let Some(pool) = test_pool().await else { return };

    let vehicles = VehicleRepository::new(pool.clone());
    let vehicle = create_vehicle(&pool).await;
    let log = FuelLogRepository::new(pool.clone())
        .create(fuel_log(&vehicle, "2024-06-01", 500, "30"))
        .await
        .unwrap();
    assert!(FuelLogRepository::new(pool.clone()).soft_delete(log.id).await.unwrap());
    let result = FuelLogRepository::new(pool.clone()).update(log).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    assert!(vehicles.soft_delete(vehicle.id).await.unwrap());
    assert!(matches!(vehicles.update(&vehicle).await, Err(AppError::NotFound(_))));

    let parts = PartRepository::new(pool.clone());
    let part = create_part(&pool, 3, "9.99").await;
    assert!(parts.soft_delete(part.id).await.unwrap());
    let result = parts.update_with(part.id, |_| Ok(())).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let users = UserRepository::new(pool.clone());
    let user = users
        .create(&User::new(
            "Gone".to_string(),
            format!("{}@fleet.test", unique("gone")),
            "hash".to_string(),
            UserRole::Technician,
            None,
        ))
        .await
        .unwrap();
    assert!(users.soft_delete(user.id).await.unwrap());
    assert!(matches!(users.update(&user).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_driver_profile_lists_current_assignment() {
    let Some(pool) = test_pool().await else { return };
    let users = UserRepository::new(pool.clone());
    let user = users
        .create(&User::new(
            "Luis Gómez".to_string(),
            format!("{}@fleet.test", unique("driver")),
            "hash".to_string(),
            UserRole::Driver,
            None,
        ))
        .await
        .unwrap();

    let expiry = Utc::now().date_naive() + Duration::days(10);
    let request = |user_id: Uuid| -> CreateDriverRequest {
        serde_json::from_value(json!({
            "user_id": user_id,
            "license_number": unique("DL"),
            "license_class": "C",
            "license_expiry": expiry
        }))
        .unwrap()
    };

    let controller = DriverController::new(pool.clone());
    let created = controller.create(request(user.id)).await.unwrap().data.unwrap();
    assert_eq!(created.license_expiry_status, LicenseExpiryStatus::ExpiringSoon);
    assert!(created.current_assignment.is_none());

    let duplicate = controller.create(request(user.id)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let vehicle = create_vehicle(&pool).await;
    VehicleRepository::new(pool.clone())
        .assign_driver(vehicle.id, user.id, None)
        .await
        .unwrap();

    let detail = DriverRepository::new(pool.clone())
        .find_detail(created.driver.id, Utc::now().date_naive())
        .await
        .unwrap()
        .unwrap();
    let assignment = detail.current_assignment.expect("active assignment");
    assert_eq!(assignment.vehicle_id, vehicle.id);
    assert_eq!(assignment.vin, vehicle.vin);
    assert_eq!(detail.user.email, user.email);
}

#[tokio::test]
async fn test_only_driver_role_users_get_profiles() {
    let Some(pool) = test_pool().await else { return };
    let technician = UserRepository::new(pool.clone())
        .create(&User::new(
            "Marta Ruiz".to_string(),
            format!("{}@fleet.test", unique("tech")),
            "hash".to_string(),
            UserRole::Technician,
            None,
        ))
        .await
        .unwrap();

    let request: CreateDriverRequest = serde_json::from_value(json!({
        "user_id": technician.id,
        "license_number": unique("DL"),
        "license_class": "B",
        "license_expiry": "2030-01-01"
    }))
    .unwrap();
    let result = DriverController::new(pool).create(request).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}
