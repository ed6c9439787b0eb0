use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::error::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::migration::Migrator;

/// Execute the migrate command
pub async fn execute(steps: Option<u32>) -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;

    info!("Connecting to database: {}", config.url);
    let connection = Database::connect(&config.url).await?;

    match steps {
        Some(n) => info!("Running {} migrations", n),
        None => info!("Running all pending migrations"),
    }

    match Migrator::up(&connection, steps).await {
        Ok(_) => {
            info!("Migrations applied");
            Ok(())
        }
        Err(e) => {
            error!("Failed to run migrations: {}", e);
            Err(Box::new(e))
        }
    }
}

/// Drop everything and migrate from scratch
pub async fn reset() -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;
    let connection = Database::connect(&config.url).await?;

    info!("Resetting database");
    Migrator::fresh(&connection).await?;
    info!("Database reset complete");
    Ok(())
}

/// Print migration status
pub async fn status() -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;
    let connection = Database::connect(&config.url).await?;

    Migrator::status(&connection).await?;
    Ok(())
}
