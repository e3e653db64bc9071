use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::vehicle_dto::{
    CreateAssignmentRequest, CreateVehicleRequest, UpdateLocationRequest, UpdateVehicleRequest,
    VehicleDetailResponse, VehicleListQuery,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::UserRole;
use crate::models::vehicle::{Vehicle, VehicleAssignment};
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service::vehicle_scope;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct VehicleController {
    repository: VehicleRepository,
    users: UserRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Vehicle> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: VehicleListQuery,
    ) -> AppResult<ApiResponse<Paginated<Vehicle>>> {
        let (vehicles, total) = self.repository.list(&query, vehicle_scope(user)).await?;
        Ok(ApiResponse::success(Paginated::new(vehicles, &query.pagination(), total)))
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        let vehicle = self.repository.create(request).await?;

        tracing::info!("🚐 Vehículo creado: {} ({})", vehicle.plate_number, vehicle.vin);

        Ok(ApiResponse::success_with_message(vehicle, "Vehicle created successfully"))
    }

    /// Detalle con coste de mantenimiento y rendimiento medio; un conductor
    /// solo ve los vehículos que tiene asignados
    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<ApiResponse<VehicleDetailResponse>> {
        let vehicle = self.find(id).await?;

        if user.role == UserRole::Driver && !self.repository.is_assigned_to(id, user.user_id).await? {
            return Err(AppError::Forbidden("This vehicle is not assigned to you".to_string()));
        }

        let (total_maintenance_cost, average_fuel_economy) = self.repository.maintenance_summary(id).await?;

        Ok(ApiResponse::success(VehicleDetailResponse {
            vehicle,
            total_maintenance_cost,
            average_fuel_economy,
        }))
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        let mut vehicle = self.find(id).await?;
        request.apply_to(&mut vehicle);

        let updated = self.repository.update(&vehicle).await?;

        Ok(ApiResponse::success_with_message(updated, "Vehicle updated successfully"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        tracing::info!("🗑️ Vehículo {} eliminado", id);

        Ok(ApiResponse::<()>::message("Vehicle deleted successfully"))
    }

    pub async fn update_location(&self, id: Uuid, request: UpdateLocationRequest) -> AppResult<ApiResponse<Vehicle>> {
        if !self
            .repository
            .update_location(id, request.latitude, request.longitude)
            .await?
        {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        let vehicle = self.find(id).await?;
        Ok(ApiResponse::success_with_message(vehicle, "Location updated successfully"))
    }

    /// Asigna un conductor; la asignación activa previa se cierra
    pub async fn assign(&self, id: Uuid, request: CreateAssignmentRequest) -> AppResult<ApiResponse<VehicleAssignment>> {
        if !self.repository.exists(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        let driver = self
            .users
            .find_by_id(request.driver_id)
            .await?
            .ok_or_else(|| not_found_error("User", &request.driver_id.to_string()))?;
        if !driver.is_driver() {
            return Err(AppError::BadRequest("Vehicles can only be assigned to drivers".to_string()));
        }

        let assignment = self.repository.assign_driver(id, driver.id, request.notes).await?;

        tracing::info!("🔑 Vehículo {} asignado a {}", id, driver.email);

        Ok(ApiResponse::success_with_message(assignment, "Vehicle assigned successfully"))
    }

    pub async fn groups(&self) -> AppResult<ApiResponse<Vec<String>>> {
        Ok(ApiResponse::success(self.repository.groups().await?))
    }
}
