use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::dto::auth_dto::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, UpdateProfileRequest};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};
use crate::utils::jwt::generate_token;

pub struct AuthController {
    state: AppState,
    repository: UserRepository,
}

impl AuthController {
    pub fn new(state: AppState) -> Self {
        let repository = UserRepository::new(state.pool.clone());
        Self { state, repository }
    }

    fn issue(&self, user: User) -> AppResult<AuthResponse> {
        let issued = generate_token(user.id, &user.email, user.role, &self.state.jwt)?;
        Ok(AuthResponse {
            role: user.role,
            user,
            token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
        })
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<ApiResponse<AuthResponse>> {
        let email = request.email.trim().to_lowercase();
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(conflict_error("User", "email", &email));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = User::new(request.name, email, password_hash, request.role, request.phone);
        let user = self.repository.create(&user).await?;

        tracing::info!("👤 Usuario registrado: {} ({})", user.email, user.role);

        Ok(ApiResponse::success_with_message(
            self.issue(user)?,
            "User registered successfully",
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<AuthResponse>> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .repository
            .find_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or_else(invalid)?;

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            tracing::warn!("🔒 Contraseña incorrecta para {}", user.email);
            return Err(invalid());
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Your account has been deactivated".to_string()));
        }

        tracing::info!("🔓 Login: {} ({})", user.email, user.role);

        Ok(ApiResponse::success_with_message(self.issue(user)?, "Login successful"))
    }

    /// Revoca el token actual hasta su expiración
    pub async fn logout(&self, user: &AuthenticatedUser) -> AppResult<ApiResponse<()>> {
        let expires_at = Utc
            .timestamp_opt(user.expires_at, 0)
            .single()
            .unwrap_or_else(Utc::now);
        self.state.revoke_token(user.token_id.clone(), expires_at).await;

        tracing::info!("👋 Logout: {}", user.email);

        Ok(ApiResponse::<()>::message("Logged out successfully"))
    }

    async fn current_user(&self, user_id: Uuid) -> AppResult<User> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error("User", &user_id.to_string()))
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> AppResult<ApiResponse<MeResponse>> {
        let current = self.current_user(user.user_id).await?;
        let permissions = self.state.permissions.describe(current.role.as_str());

        Ok(ApiResponse::success(MeResponse { user: current, permissions }))
    }

    /// Edición del propio perfil; cambiar la contraseña exige la actual
    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        request: UpdateProfileRequest,
    ) -> AppResult<ApiResponse<User>> {
        let mut current = self.current_user(user.user_id).await?;

        if let Some(new_password) = &request.password {
            let current_password = request
                .current_password
                .as_deref()
                .ok_or_else(|| AppError::BadRequest("The current password is required".to_string()))?;

            let matches = bcrypt::verify(current_password, &current.password_hash)
                .map_err(|e| AppError::Hash(e.to_string()))?;
            if !matches {
                return Err(AppError::BadRequest("The current password is incorrect".to_string()));
            }

            current.password_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
                .map_err(|e| AppError::Hash(e.to_string()))?;
        }

        if let Some(name) = request.name {
            current.name = name;
        }
        if request.phone.is_some() {
            current.phone = request.phone;
        }
        if request.address.is_some() {
            current.address = request.address;
        }

        let updated = self.repository.update(&current).await?;

        Ok(ApiResponse::success_with_message(updated, "Profile updated successfully"))
    }
}
