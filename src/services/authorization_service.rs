//! Servicio de autorización
//!
//! Tabla de capacidades por rol (inmutable, construida una vez al arrancar y
//! compartida a través de `AppState`) y comprobaciones de rol que usan los
//! controladores.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::UserRole;
use crate::utils::errors::{AppError, AppResult};

/// Descriptor de capacidades de un rol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePermissions {
    pub system_admin: bool,
    pub financial_data: &'static str,
    pub vehicles: &'static str,
    pub work_orders: &'static str,
    pub parts: &'static str,
    pub fuel: &'static str,
    pub reports: &'static str,
}

/// Tabla rol -> capacidades
#[derive(Debug, Clone)]
pub struct RolePermissionTable {
    entries: HashMap<UserRole, RolePermissions>,
}

impl RolePermissionTable {
    pub fn new() -> Self {
        let mut entries = HashMap::with_capacity(UserRole::ALL.len());
        entries.insert(
            UserRole::Administrator,
            RolePermissions {
                system_admin: true,
                financial_data: "full",
                vehicles: "full_crud",
                work_orders: "full",
                parts: "full",
                fuel: "full",
                reports: "all",
            },
        );
        entries.insert(
            UserRole::FleetManager,
            RolePermissions {
                system_admin: false,
                financial_data: "full",
                vehicles: "full_crud",
                work_orders: "create_assign",
                parts: "manage",
                fuel: "full",
                reports: "all",
            },
        );
        entries.insert(
            UserRole::Technician,
            RolePermissions {
                system_admin: false,
                financial_data: "none",
                vehicles: "view",
                work_orders: "update_log",
                parts: "view_use",
                fuel: "none",
                reports: "limited",
            },
        );
        entries.insert(
            UserRole::Driver,
            RolePermissions {
                system_admin: false,
                financial_data: "none",
                vehicles: "view_own",
                work_orders: "create_request",
                parts: "none",
                fuel: "log",
                reports: "none",
            },
        );
        Self { entries }
    }

    pub fn get(&self, role: UserRole) -> Option<&RolePermissions> {
        self.entries.get(&role)
    }

    /// Descriptor en JSON para un nombre de rol; `{}` si el rol no existe
    pub fn describe(&self, role_name: &str) -> Value {
        role_name
            .parse::<UserRole>()
            .ok()
            .and_then(|role| self.get(role))
            .and_then(|permissions| serde_json::to_value(permissions).ok())
            .unwrap_or_else(|| json!({}))
    }
}

impl Default for RolePermissionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Verifica si un usuario tiene al menos uno de los roles requeridos
pub fn has_any_role(user: &AuthenticatedUser, required_roles: &[UserRole]) -> bool {
    required_roles.contains(&user.role)
}

/// Igual que `has_any_role` pero devuelve `Forbidden`
pub fn require_roles(user: &AuthenticatedUser, required_roles: &[UserRole]) -> AppResult<()> {
    if has_any_role(user, required_roles) {
        Ok(())
    } else {
        tracing::warn!(
            "🚫 Rol '{}' sin acceso (requiere uno de: {:?})",
            user.role,
            required_roles.iter().map(|r| r.as_str()).collect::<Vec<_>>()
        );
        Err(AppError::Forbidden(
            "You do not have permission to perform this action".to_string(),
        ))
    }
}

/// Qué filas de un listado puede ver el usuario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    /// Órdenes asignadas al técnico
    OwnWorkOrders(Uuid),
    /// Registros ligados a los vehículos asignados al conductor
    AssignedVehicles(Uuid),
    /// Repostajes registrados por el conductor
    OwnFuelLogs(Uuid),
}

pub fn work_order_scope(user: &AuthenticatedUser) -> ListScope {
    match user.role {
        UserRole::Technician => ListScope::OwnWorkOrders(user.user_id),
        UserRole::Driver => ListScope::AssignedVehicles(user.user_id),
        UserRole::Administrator | UserRole::FleetManager => ListScope::All,
    }
}

pub fn vehicle_scope(user: &AuthenticatedUser) -> ListScope {
    match user.role {
        UserRole::Driver => ListScope::AssignedVehicles(user.user_id),
        _ => ListScope::All,
    }
}

pub fn fuel_log_scope(user: &AuthenticatedUser) -> ListScope {
    match user.role {
        UserRole::Driver => ListScope::OwnFuelLogs(user.user_id),
        _ => ListScope::All,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "someone@fleet.test".to_string(),
            role,
            token_id: "jti".to_string(),
            expires_at: 0,
        }
    }

    #[test]
    fn test_describe_known_roles() {
        let table = RolePermissionTable::new();
        let admin = table.describe("Administrator");
        assert_eq!(admin["system_admin"], true);
        assert_eq!(admin["vehicles"], "full_crud");

        let manager = table.describe("Fleet Manager");
        assert_eq!(manager["work_orders"], "create_assign");
        assert_eq!(manager["parts"], "manage");

        let tech = table.describe("Technician");
        assert_eq!(tech["parts"], "view_use");
        assert_eq!(tech["reports"], "limited");

        let driver = table.describe("Driver");
        assert_eq!(driver["fuel"], "log");
        assert_eq!(driver["vehicles"], "view_own");
    }

    #[test]
    fn test_unknown_role_is_empty_descriptor() {
        let table = RolePermissionTable::new();
        assert_eq!(table.describe("Mechanic"), json!({}));
        assert_eq!(table.describe(""), json!({}));
    }

    #[test]
    fn test_every_role_has_an_entry() {
        let table = RolePermissionTable::default();
        for role in UserRole::ALL {
            assert!(table.get(role).is_some(), "missing entry for {}", role);
        }
        assert!(!table.get(UserRole::FleetManager).unwrap().system_admin);
    }

    #[test]
    fn test_require_roles() {
        use crate::models::auth::{MANAGEMENT_ROLES, WORKSHOP_ROLES};

        assert!(require_roles(&user(UserRole::FleetManager), MANAGEMENT_ROLES).is_ok());
        assert!(require_roles(&user(UserRole::Technician), WORKSHOP_ROLES).is_ok());
        assert!(matches!(
            require_roles(&user(UserRole::Technician), MANAGEMENT_ROLES),
            Err(AppError::Forbidden(_))
        ));
        assert!(!has_any_role(&user(UserRole::Driver), WORKSHOP_ROLES));
    }

    #[test]
    fn test_list_scopes() {
        let tech = user(UserRole::Technician);
        assert_eq!(work_order_scope(&tech), ListScope::OwnWorkOrders(tech.user_id));
        assert_eq!(vehicle_scope(&tech), ListScope::All);

        let driver = user(UserRole::Driver);
        assert_eq!(work_order_scope(&driver), ListScope::AssignedVehicles(driver.user_id));
        assert_eq!(vehicle_scope(&driver), ListScope::AssignedVehicles(driver.user_id));
        assert_eq!(fuel_log_scope(&driver), ListScope::OwnFuelLogs(driver.user_id));

        assert_eq!(work_order_scope(&user(UserRole::Administrator)), ListScope::All);
    }
}
