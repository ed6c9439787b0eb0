use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Statement};
use std::fmt;

use crate::domain::models::TransactionRow;
use crate::infrastructure::persistence::entities::transactions;
use crate::infrastructure::persistence::error::DbError;

use super::address_repository::max_id_of;
use super::{sql_str, FLUSH_CHUNK, LOAD_CHUNK};

/// Repository for the transactions table
#[derive(Clone)]
pub struct TransactionRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for TransactionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionRepository")
            .finish_non_exhaustive()
    }
}

impl TransactionRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Bulk load transaction rows by hash
    pub async fn load_by_hashes(&self, hashes: &[String]) -> Result<Vec<TransactionRow>, DbError> {
        let mut rows = Vec::new();
        for chunk in hashes.chunks(LOAD_CHUNK) {
            let models = transactions::Entity::find()
                .filter(transactions::Column::Hash.is_in(chunk.iter().cloned()))
                .all(&self.conn)
                .await?;
            rows.extend(models.into_iter().map(|m| TransactionRow {
                id: m.id,
                hash: m.hash,
            }));
        }
        Ok(rows)
    }

    /// Highest assigned id, for seeding the in-memory id allocator
    pub async fn max_id(&self) -> Result<i64, DbError> {
        max_id_of(&self.conn, "transactions").await
    }

    /// Bulk insert new transactions; rows are immutable
    pub async fn flush<C: ConnectionTrait>(
        &self,
        conn: &C,
        rows: &[TransactionRow],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(FLUSH_CHUNK) {
            let values: Vec<String> = chunk
                .iter()
                .map(|t| format!("({}, {})", t.id, sql_str(&t.hash)))
                .collect();

            let sql = format!(
                "INSERT INTO transactions (id, hash) VALUES {} ON CONFLICT (id) DO NOTHING",
                values.join(", ")
            );

            conn.execute(Statement::from_string(DbBackend::Postgres, sql))
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;
        }
        Ok(())
    }
}
