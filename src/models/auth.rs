use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles del sistema - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    #[sqlx(rename = "Administrator")]
    #[serde(rename = "Administrator")]
    Administrator,
    #[sqlx(rename = "Fleet Manager")]
    #[serde(rename = "Fleet Manager")]
    FleetManager,
    #[sqlx(rename = "Technician")]
    #[serde(rename = "Technician")]
    Technician,
    #[sqlx(rename = "Driver")]
    #[serde(rename = "Driver")]
    Driver,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Administrator,
        UserRole::FleetManager,
        UserRole::Technician,
        UserRole::Driver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrator => "Administrator",
            UserRole::FleetManager => "Fleet Manager",
            UserRole::Technician => "Technician",
            UserRole::Driver => "Driver",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role '{}'", s))
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles con gestión completa de flota
pub const MANAGEMENT_ROLES: &[UserRole] = &[UserRole::Administrator, UserRole::FleetManager];

/// Roles que pueden trabajar sobre órdenes de trabajo e inventario
pub const WORKSHOP_ROLES: &[UserRole] = &[
    UserRole::Administrator,
    UserRole::FleetManager,
    UserRole::Technician,
];

/// Roles que pueden registrar repostajes
pub const FUEL_LOGGING_ROLES: &[UserRole] = &[
    UserRole::Administrator,
    UserRole::FleetManager,
    UserRole::Driver,
];

pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Administrator];
