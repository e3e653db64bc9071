use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::fuel_log_dto::{CreateFuelLogRequest, FuelLogListQuery, UpdateFuelLogRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::UserRole;
use crate::models::fuel_log::FuelLog;
use crate::repositories::fuel_log_repository::FuelLogRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service::fuel_log_scope;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct FuelLogController {
    repository: FuelLogRepository,
    vehicles: VehicleRepository,
    users: UserRepository,
}

impl FuelLogController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FuelLogRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<FuelLog> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fuel log", &id.to_string()))
    }

    async fn check_references(&self, vehicle_id: Option<Uuid>, driver_id: Option<Uuid>) -> AppResult<()> {
        if let Some(vehicle_id) = vehicle_id {
            if !self.vehicles.exists(vehicle_id).await? {
                return Err(AppError::BadRequest(format!("Vehicle '{}' does not exist", vehicle_id)));
            }
        }
        if let Some(driver_id) = driver_id {
            if self.users.find_by_id(driver_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("User '{}' does not exist", driver_id)));
            }
        }
        Ok(())
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: FuelLogListQuery,
    ) -> AppResult<ApiResponse<Paginated<FuelLog>>> {
        let (logs, total) = self.repository.list(&query, fuel_log_scope(user)).await?;
        Ok(ApiResponse::success(Paginated::new(logs, &query.pagination(), total)))
    }

    /// Registra un repostaje; si quien lo registra es conductor y no indica
    /// `driver_id`, queda a su nombre
    pub async fn create(&self, user: &AuthenticatedUser, request: CreateFuelLogRequest) -> AppResult<ApiResponse<FuelLog>> {
        self.check_references(Some(request.vehicle_id), request.driver_id).await?;

        let driver_id = match (request.driver_id, user.role) {
            (Some(driver_id), _) => Some(driver_id),
            (None, UserRole::Driver) => Some(user.user_id),
            (None, _) => None,
        };

        let log = self.repository.create(request.into_fuel_log(driver_id)).await?;

        tracing::info!(
            "⛽ Repostaje registrado para {}: {} x {} = {} (rendimiento {:?})",
            log.vehicle_id,
            log.quantity,
            log.cost_per_unit,
            log.total_cost,
            log.fuel_economy
        );

        Ok(ApiResponse::success_with_message(log, "Fuel log created successfully"))
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<ApiResponse<FuelLog>> {
        let log = self.find(id).await?;

        if user.role == UserRole::Driver && log.driver_id != Some(user.user_id) {
            return Err(AppError::Forbidden("You can only view your own fuel logs".to_string()));
        }

        Ok(ApiResponse::success(log))
    }

    pub async fn update(&self, id: Uuid, request: UpdateFuelLogRequest) -> AppResult<ApiResponse<FuelLog>> {
        self.check_references(request.vehicle_id, request.driver_id).await?;

        let mut log = self.find(id).await?;
        request.apply_to(&mut log);

        let updated = self.repository.update(log).await?;

        Ok(ApiResponse::success_with_message(updated, "Fuel log updated successfully"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Fuel log", &id.to_string()));
        }

        tracing::info!("🗑️ Repostaje {} eliminado", id);

        Ok(ApiResponse::<()>::message("Fuel log deleted successfully"))
    }
}
