use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Statement};
use std::fmt;

use crate::domain::models::Address;
use crate::infrastructure::persistence::entities::addresses;
use crate::infrastructure::persistence::error::DbError;

use super::{sql_str, FLUSH_CHUNK, LOAD_CHUNK};

/// Repository for the addresses table
#[derive(Clone)]
pub struct AddressRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for AddressRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressRepository").finish_non_exhaustive()
    }
}

impl AddressRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Bulk load address rows by internal id
    pub async fn load_by_ids(&self, ids: &[i64]) -> Result<Vec<Address>, DbError> {
        let mut rows = Vec::new();
        for chunk in ids.chunks(LOAD_CHUNK) {
            let models = addresses::Entity::find()
                .filter(addresses::Column::Id.is_in(chunk.iter().copied()))
                .all(&self.conn)
                .await?;
            rows.extend(models.into_iter().map(to_domain));
        }
        Ok(rows)
    }

    /// Bulk load address rows by address string
    pub async fn load_by_strings(&self, strings: &[String]) -> Result<Vec<Address>, DbError> {
        let mut rows = Vec::new();
        for chunk in strings.chunks(LOAD_CHUNK) {
            let models = addresses::Entity::find()
                .filter(addresses::Column::Address.is_in(chunk.iter().cloned()))
                .all(&self.conn)
                .await?;
            rows.extend(models.into_iter().map(to_domain));
        }
        Ok(rows)
    }

    /// Highest assigned id, for seeding the in-memory id allocator
    pub async fn max_id(&self) -> Result<i64, DbError> {
        max_id_of(&self.conn, "addresses").await
    }

    /// Bulk insert new addresses; existing rows are immutable
    pub async fn flush<C: ConnectionTrait>(
        &self,
        conn: &C,
        rows: &[Address],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(FLUSH_CHUNK) {
            let values: Vec<String> = chunk
                .iter()
                .map(|a| format!("({}, {})", a.id, sql_str(&a.address)))
                .collect();

            let sql = format!(
                "INSERT INTO addresses (id, address) VALUES {} ON CONFLICT (id) DO NOTHING",
                values.join(", ")
            );

            conn.execute(Statement::from_string(DbBackend::Postgres, sql))
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;
        }
        Ok(())
    }
}

pub(crate) async fn max_id_of(conn: &DatabaseConnection, table: &str) -> Result<i64, DbError> {
    let sql = format!("SELECT COALESCE(MAX(id), 0) AS max_id FROM {}", table);
    let result = conn
        .query_one(Statement::from_string(DbBackend::Postgres, sql))
        .await
        .map_err(|e| DbError::QueryError(e.to_string()))?;

    match result {
        Some(row) => row
            .try_get("", "max_id")
            .map_err(|e| DbError::QueryError(e.to_string())),
        None => Ok(0),
    }
}

fn to_domain(model: addresses::Model) -> Address {
    Address {
        id: model.id,
        address: model.address,
    }
}
