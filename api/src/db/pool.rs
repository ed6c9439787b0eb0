use sea_orm::{Database, DatabaseConnection};

use crate::config::ApiConfig;
use crate::db::error::DbError;
use crate::db::repositories::Repositories;

/// Manages the database connection pool
pub struct DbPool {
    connection: DatabaseConnection,
}

impl DbPool {
    /// Creates a new database connection pool
    pub async fn new(config: &ApiConfig) -> Result<Self, DbError> {
        let connection = Database::connect(&config.database_url)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(DbPool { connection })
    }

    /// Creates the repository set over this pool
    pub fn repositories(&self) -> Repositories {
        Repositories::new(self.connection.clone())
    }
}
