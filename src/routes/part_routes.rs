use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::part_controller::PartController;
use crate::dto::common_dto::{ApiResponse, Paginated};
use crate::dto::part_dto::{
    AdjustStockRequest, AdjustStockResponse, CreatePartRequest, PartDetailResponse, PartListQuery, PartResponse,
    UpdatePartRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::{MANAGEMENT_ROLES, WORKSHOP_ROLES};
use crate::services::authorization_service::require_roles;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_part_router() -> Router<AppState> {
    Router::new()
        .route("/parts", get(list_parts).post(create_part))
        .route("/parts/:id", get(get_part).put(update_part).delete(delete_part))
        .route("/parts/:id/adjust-stock", post(adjust_stock))
        .route("/parts-low-stock", get(low_stock))
        .route("/parts-categories", get(categories))
        .route("/parts-manufacturers", get(manufacturers))
}

async fn list_parts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<PartListQuery>,
) -> Result<Json<ApiResponse<Paginated<PartResponse>>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn create_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartResponse>>), AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PartDetailResponse>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePartRequest>,
) -> Result<Json<ApiResponse<PartResponse>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn adjust_stock(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdjustStockRequest>,
) -> Result<Json<ApiResponse<AdjustStockResponse>>, AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.adjust_stock(id, request).await?;
    Ok(Json(response))
}

async fn low_stock(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<PartResponse>>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.low_stock().await?;
    Ok(Json(response))
}

async fn categories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.categories().await?;
    Ok(Json(response))
}

async fn manufacturers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    let controller = PartController::new(state.pool.clone());
    let response = controller.manufacturers().await?;
    Ok(Json(response))
}
