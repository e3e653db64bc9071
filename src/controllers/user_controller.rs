use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::auth_dto::UpdateUserRequest;
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Administración de usuarios
pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<User>>> {
        let users = self.repository.list().await?;
        Ok(ApiResponse::success(users))
    }

    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> AppResult<ApiResponse<User>> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(email) = request.email {
            user.email = email.trim().to_lowercase();
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if request.phone.is_some() {
            user.phone = request.phone;
        }
        if let Some(is_active) = request.is_active {
            user.is_active = is_active;
        }

        let updated = self.repository.update(&user).await?;
        tracing::info!("👤 Usuario {} actualizado (rol {})", updated.email, updated.role);

        Ok(ApiResponse::success_with_message(updated, "User updated successfully"))
    }

    /// Un administrador no puede borrarse a sí mismo
    pub async fn delete(&self, admin: &AuthenticatedUser, id: Uuid) -> AppResult<ApiResponse<()>> {
        if admin.user_id == id {
            return Err(AppError::Forbidden("You cannot delete your own account".to_string()));
        }

        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("User", &id.to_string()));
        }

        tracing::info!("🗑️ Usuario {} eliminado por {}", id, admin.email);

        Ok(ApiResponse::<()>::message("User deleted successfully"))
    }
}
