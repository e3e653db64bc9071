//! Conexión a PostgreSQL y migraciones embebidas

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Crea el pool y aplica las migraciones pendientes
pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<PgPool> {
    tracing::info!("🔌 Conectando a {}", mask_database_url(&config.url));

    let pool = config
        .create_pool()
        .await
        .context("failed to connect to PostgreSQL")?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("✅ Migraciones aplicadas");
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
