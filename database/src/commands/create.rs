use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};
use std::error::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Execute the create command: connect to the maintenance database and
/// create the target database if it does not exist
pub async fn execute(name: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;

    let database = match name.as_deref().or_else(|| config.database_name()) {
        Some(database) => database.to_string(),
        None => {
            error!("No database name in DATABASE_URL and none supplied");
            return Err("missing database name".into());
        }
    };

    info!("Connecting to {}", config.admin_url());
    let connection = Database::connect(config.admin_url()).await?;

    let exists = connection
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            format!(
                "SELECT 1 AS one FROM pg_database WHERE datname = '{}'",
                database.replace('\'', "''")
            ),
        ))
        .await?
        .is_some();

    if exists {
        info!("Database {} already exists", database);
        return Ok(());
    }

    connection
        .execute(Statement::from_string(
            DbBackend::Postgres,
            format!("CREATE DATABASE \"{}\"", database.replace('"', "\"\"")),
        ))
        .await?;
    info!("Created database {}", database);

    Ok(())
}
