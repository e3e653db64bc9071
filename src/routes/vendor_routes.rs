use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use validator::Validate;

use crate::controllers::vendor_controller::VendorController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::vendor_dto::CreateVendorRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::{MANAGEMENT_ROLES, WORKSHOP_ROLES};
use crate::models::vendor::Vendor;
use crate::services::authorization_service::require_roles;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vendor_router() -> Router<AppState> {
    Router::new().route("/vendors", get(list_vendors).post(create_vendor))
}

async fn list_vendors(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<Vendor>>>, AppError> {
    require_roles(&user, WORKSHOP_ROLES)?;
    let controller = VendorController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn create_vendor(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateVendorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vendor>>), AppError> {
    require_roles(&user, MANAGEMENT_ROLES)?;
    request.validate()?;
    let controller = VendorController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
