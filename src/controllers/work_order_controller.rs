use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::work_order_dto::{
    AddPartsRequest, AssignTechnicianRequest, CreateWorkOrderRequest, UpdateStatusRequest, UpdateWorkOrderRequest,
    WorkOrderListQuery, WorkOrderResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::work_order::WorkOrder;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::vendor_repository::VendorRepository;
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::services::authorization_service::work_order_scope;
use crate::services::work_order_service::{apply_status, parse_status};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct WorkOrderController {
    repository: WorkOrderRepository,
    vehicles: VehicleRepository,
    users: UserRepository,
    vendors: VendorRepository,
}

impl WorkOrderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: WorkOrderRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            vendors: VendorRepository::new(pool),
        }
    }

    /// Comprueba que las referencias de la orden existen
    async fn check_references(
        &self,
        vehicle_id: Option<Uuid>,
        technician_id: Option<Uuid>,
        vendor_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(vehicle_id) = vehicle_id {
            if !self.vehicles.exists(vehicle_id).await? {
                return Err(AppError::BadRequest(format!("Vehicle '{}' does not exist", vehicle_id)));
            }
        }
        if let Some(technician_id) = technician_id {
            if self.users.find_by_id(technician_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("User '{}' does not exist", technician_id)));
            }
        }
        if let Some(vendor_id) = vendor_id {
            if !self.vendors.exists(vendor_id).await? {
                return Err(AppError::BadRequest(format!("Vendor '{}' does not exist", vendor_id)));
            }
        }
        Ok(())
    }

    async fn with_parts(&self, work_order: WorkOrder) -> AppResult<WorkOrderResponse> {
        let parts = self.repository.parts_for(work_order.id).await?;
        Ok(WorkOrderResponse { work_order, parts })
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: WorkOrderListQuery,
    ) -> AppResult<ApiResponse<Paginated<WorkOrder>>> {
        let (work_orders, total) = self.repository.list(&query, work_order_scope(user)).await?;
        Ok(ApiResponse::success(Paginated::new(work_orders, &query.pagination(), total)))
    }

    /// Alta; la orden nace `Pending` con su número correlativo
    pub async fn create(&self, request: CreateWorkOrderRequest) -> AppResult<ApiResponse<WorkOrder>> {
        self.check_references(Some(request.vehicle_id), request.technician_id, request.vendor_id)
            .await?;

        let work_order = self.repository.create(request.into()).await?;

        tracing::info!(
            "🔧 Orden {} creada para el vehículo {}",
            work_order.work_order_number,
            work_order.vehicle_id
        );

        Ok(ApiResponse::success_with_message(work_order, "Work order created successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<WorkOrderResponse>> {
        let work_order = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Work order", &id.to_string()))?;

        Ok(ApiResponse::success(self.with_parts(work_order).await?))
    }

    /// Edición completa; un `status` presente aplica los mismos efectos que el PATCH
    pub async fn update(&self, id: Uuid, request: UpdateWorkOrderRequest) -> AppResult<ApiResponse<WorkOrderResponse>> {
        let status = request.status.as_deref().map(parse_status).transpose()?;
        self.check_references(request.vehicle_id, request.technician_id, request.vendor_id)
            .await?;

        let work_order = self
            .repository
            .update_with(id, |work_order| {
                request.apply_fields(work_order);
                if let Some(status) = status {
                    apply_status(work_order, status, chrono::Utc::now());
                }
                Ok(())
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            self.with_parts(work_order).await?,
            "Work order updated successfully",
        ))
    }

    pub async fn update_status(&self, id: Uuid, request: UpdateStatusRequest) -> AppResult<ApiResponse<WorkOrder>> {
        let work_order = self.repository.set_status(id, &request.status).await?;

        tracing::info!("🔧 Orden {} -> {}", work_order.work_order_number, work_order.status);

        Ok(ApiResponse::success_with_message(work_order, "Work order status updated successfully"))
    }

    pub async fn assign_technician(
        &self,
        id: Uuid,
        request: AssignTechnicianRequest,
    ) -> AppResult<ApiResponse<WorkOrder>> {
        self.check_references(None, Some(request.technician_id), None).await?;

        let work_order = self.repository.assign_technician(id, request.technician_id).await?;

        tracing::info!(
            "🧑‍🔧 Técnico {} asignado a la orden {}",
            request.technician_id,
            work_order.work_order_number
        );

        Ok(ApiResponse::success_with_message(work_order, "Technician assigned successfully"))
    }

    /// Consume repuestos; todo el lote se aplica o no se aplica nada
    pub async fn add_parts(&self, id: Uuid, request: AddPartsRequest) -> AppResult<ApiResponse<WorkOrderResponse>> {
        if request.parts.is_empty() {
            return Err(AppError::BadRequest("At least one part is required".to_string()));
        }

        let (work_order, attached) = self.repository.add_parts(id, &request.lines()).await?;

        tracing::info!(
            "📦 {} línea(s) de repuestos añadidas a {} (parts_cost = {})",
            attached.len(),
            work_order.work_order_number,
            work_order.parts_cost
        );

        Ok(ApiResponse::success_with_message(
            self.with_parts(work_order).await?,
            "Parts added successfully",
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Work order", &id.to_string()));
        }

        tracing::info!("🗑️ Orden {} eliminada", id);

        Ok(ApiResponse::<()>::message("Work order deleted successfully"))
    }
}
