use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::fuel_log_controller::FuelLogController;
use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::fuel_log_dto::{CreateFuelLogRequest, FuelLogListQuery, UpdateFuelLogRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::{FUEL_LOGGING_ROLES, MANAGEMENT_ROLES};
use crate::models::fuel_log::FuelLog;
use crate::services::authorization_service::require_roles;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_log_router() -> Router<AppState> {
    Router::new()
        .route("/fuel-logs", get(list_fuel_logs).post(create_fuel_log))
        .route(
            "/fuel-logs/:id",
            get(get_fuel_log).put(update_fuel_log).delete(delete_fuel_log),
        )
}

async fn list_fuel_logs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<FuelLogListQuery>,
) -> Result<Json<ApiResponse<Paginated<FuelLog>>>, AppError> {
    let controller = FuelLogController::new(state.pool.clone());
    let response = controller.list(&user, query).await?;
    Ok(Json(response))
}

async fn create_fuel_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateFuelLogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FuelLog>>), AppError> {
    require_roles(&user, FUEL_LOGGING_ROLES)?;
    request.validate()?;
    let controller = FuelLogController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_fuel_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FuelLog>>, AppError> {
    let controller = FuelLogController::new(state.pool.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn update_fuel_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFuelLogRequest>,
) -> Result<Json<ApiResponse<FuelLog>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = FuelLogController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_fuel_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    let controller = FuelLogController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
