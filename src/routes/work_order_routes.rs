use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::work_order_controller::WorkOrderController;
use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::work_order_dto::{
    AddPartsRequest, AssignTechnicianRequest, CreateWorkOrderRequest, UpdateStatusRequest, UpdateWorkOrderRequest,
    WorkOrderListQuery, WorkOrderResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::{MANAGEMENT_ROLES, WORKSHOP_ROLES};
use crate::models::work_order::WorkOrder;
use crate::services::authorization_service::require_roles;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_work_order_router() -> Router<AppState> {
    Router::new()
        .route("/work-orders", get(list_work_orders).post(create_work_order))
        .route(
            "/work-orders/:id",
            get(get_work_order).put(update_work_order).delete(delete_work_order),
        )
        .route("/work-orders/:id/status", patch(update_status))
        .route("/work-orders/:id/assign-technician", post(assign_technician))
        .route("/work-orders/:id/add-parts", post(add_parts))
}

async fn list_work_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<WorkOrderListQuery>,
) -> Result<Json<ApiResponse<Paginated<WorkOrder>>>, AppError> {
    let controller = WorkOrderController::new(state.pool.clone());
    let response = controller.list(&user, query).await?;
    Ok(Json(response))
}

async fn create_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateWorkOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkOrder>>), AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = WorkOrderController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_work_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    request.validate()?;
    let controller = WorkOrderController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    let controller = WorkOrderController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<WorkOrder>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    let controller = WorkOrderController::new(state.pool.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}

async fn assign_technician(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignTechnicianRequest>,
) -> Result<Json<ApiResponse<WorkOrder>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    let controller = WorkOrderController::new(state.pool.clone());
    let response = controller.assign_technician(id, request).await?;
    Ok(Json(response))
}

async fn add_parts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddPartsRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    request.validate()?;
    let controller = WorkOrderController::new(state.pool.clone());
    let response = controller.add_parts(id, request).await?;
    Ok(Json(response))
}
