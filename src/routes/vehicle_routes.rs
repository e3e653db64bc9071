use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::vehicle_dto::{
    CreateAssignmentRequest, CreateVehicleRequest, UpdateLocationRequest, UpdateVehicleRequest,
    VehicleDetailResponse, VehicleListQuery,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::MANAGEMENT_ROLES;
use crate::models::vehicle::{Vehicle, VehicleAssignment};
use crate::services::authorization_service::require_roles;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/vehicles/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/vehicles/:id/location", put(update_location))
        .route("/vehicles/:id/assignments", post(assign_vehicle))
        .route("/vehicle-groups", get(list_groups))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<VehicleListQuery>,
) -> Result<Json<ApiResponse<Paginated<Vehicle>>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list(&user, query).await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleDetailResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn update_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update_location(id, request).await?;
    Ok(Json(response))
}

async fn assign_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleAssignment>>), AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.assign(id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_groups(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.groups().await?;
    Ok(Json(response))
}
