use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::{auth::UserRole, user::User};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8), must_match = "password_confirmation")]
    pub password: String,
    pub password_confirmation: String,
    pub role: UserRole,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Respuesta de login/registro
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub role: UserRole,
}

/// Respuesta de `/me`
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub permissions: Value,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub current_password: Option<String>,
    #[validate(length(min = 8), must_match = "password_confirmation")]
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// Edición de usuarios por un administrador
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_requires_matching_confirmation() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Marta Ruiz",
            "email": "marta@fleet.test",
            "password": "supersecret",
            "password_confirmation": "different1",
            "role": "Fleet Manager"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_rejects_unknown_role() {
        let result: Result<RegisterRequest, _> = serde_json::from_value(serde_json::json!({
            "name": "Marta Ruiz",
            "email": "marta@fleet.test",
            "password": "supersecret",
            "password_confirmation": "supersecret",
            "role": "Mechanic"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_login_validation() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
