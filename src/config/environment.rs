//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{bail, Context, Result};
use std::env;

const DEV_JWT_SECRET: &str = "fleet-maintenance-dev-secret";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl EnvironmentConfig {
    /// Lee la configuración del entorno; solo `JWT_SECRET` es obligatorio y
    /// únicamente en producción
    pub fn from_env() -> Result<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .context("JWT_EXPIRATION must be a valid number of seconds")?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "production" => bail!("JWT_SECRET must be set in production"),
            _ => DEV_JWT_SECRET.to_string(),
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|origins| parse_origins(&origins))
            .unwrap_or_default();

        Ok(Self {
            environment,
            port,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret,
            jwt_expiration,
            cors_origins,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Configuración fija para tests
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: jwt_secret.to_string(),
            jwt_expiration: 3600,
            cors_origins: Vec::new(),
            log_level: "debug".to_string(),
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Nivel de tracing a partir de `LOG_LEVEL`
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blanks() {
        assert_eq!(
            parse_origins("http://localhost:3000, ,https://fleet.example.com"),
            vec!["http://localhost:3000", "https://fleet.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_tracing_level_falls_back_to_info() {
        let mut config = EnvironmentConfig::for_tests("secret");
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
        config.log_level = "verbose".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
