use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::driver_controller::DriverController;
use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::driver_dto::{CreateDriverRequest, DriverListQuery, DriverResponse, UpdateDriverRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::MANAGEMENT_ROLES;
use crate::services::authorization_service::require_roles;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/drivers", get(list_drivers).post(create_driver))
        .route("/drivers/:id", get(get_driver).put(update_driver).delete(delete_driver))
}

async fn list_drivers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DriverListQuery>,
) -> Result<Json<ApiResponse<Paginated<DriverResponse>>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    let controller = DriverController::new(state.pool.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn create_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateDriverRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DriverResponse>>), AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = DriverController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DriverResponse>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    let controller = DriverController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<DriverResponse>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = DriverController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    let controller = DriverController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
