use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Statement};
use std::fmt;

use crate::infrastructure::persistence::entities::bookmarks;
use crate::infrastructure::persistence::error::DbError;

use super::sql_str;

/// Repository for the bookmark row tracking indexing progress
#[derive(Clone)]
pub struct BookmarkRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for BookmarkRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookmarkRepository").finish_non_exhaustive()
    }
}

impl BookmarkRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Height of the last flushed block, if any
    pub async fn get_last_processed_block(&self, network: &str) -> Result<Option<u32>, DbError> {
        let row = bookmarks::Entity::find()
            .filter(bookmarks::Column::Network.eq(network))
            .one(&self.conn)
            .await?;
        Ok(row.map(|r| r.block_height as u32))
    }

    /// Upsert the bookmark; called inside the block flush transaction
    pub async fn save<C: ConnectionTrait>(
        &self,
        conn: &C,
        network: &str,
        block_hash: &str,
        height: u32,
        confirmed: bool,
    ) -> Result<(), DbError> {
        let sql = format!(
            "INSERT INTO bookmarks (network, block_hash, block_height, confirmed) \
             VALUES ({}, {}, {}, {}) \
             ON CONFLICT (network) DO UPDATE SET block_hash = EXCLUDED.block_hash, \
             block_height = EXCLUDED.block_height, confirmed = EXCLUDED.confirmed",
            sql_str(network),
            sql_str(block_hash),
            height as i32,
            confirmed,
        );

        conn.execute(Statement::from_string(DbBackend::Postgres, sql))
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(())
    }
}
