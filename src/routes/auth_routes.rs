use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, UpdateProfileRequest};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas: registro y login
pub fn create_public_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Rutas de sesión para cualquier usuario autenticado
pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    request.validate()?;
    let controller = AuthController::new(state);
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    request.validate()?;
    let controller = AuthController::new(state);
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AuthController::new(state);
    let response = controller.logout(&user).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<MeResponse>>, AppError> {
    let controller = AuthController::new(state);
    let response = controller.me(&user).await?;
    Ok(Json(response))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    request.validate()?;
    let controller = AuthController::new(state);
    let response = controller.update_profile(&user, request).await?;
    Ok(Json(response))
}
