use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use std::fmt;

use crate::infrastructure::persistence::error::DbError;

use super::sql_str;

/// Repository for per-block processing records; written best-effort outside
/// the block transaction
#[derive(Clone)]
pub struct BlockStatusRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for BlockStatusRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockStatusRepository")
            .finish_non_exhaustive()
    }
}

impl BlockStatusRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Record a processed block with its transaction and event counts
    pub async fn mark_processed(
        &self,
        height: u32,
        block_hash: &str,
        tx_count: i32,
        event_count: i32,
        confirmed: bool,
    ) -> Result<(), DbError> {
        let sql = format!(
            "INSERT INTO block_statuses (height, block_hash, tx_count, event_count, confirmed, \
             processed_at) VALUES ({}, {}, {}, {}, {}, NOW()) \
             ON CONFLICT (height) DO UPDATE SET block_hash = EXCLUDED.block_hash, \
             tx_count = EXCLUDED.tx_count, event_count = EXCLUDED.event_count, \
             confirmed = EXCLUDED.confirmed, processed_at = EXCLUDED.processed_at",
            height as i32,
            sql_str(block_hash),
            tx_count,
            event_count,
            confirmed,
        );

        self.conn
            .execute(Statement::from_string(DbBackend::Postgres, sql))
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(())
    }
}
