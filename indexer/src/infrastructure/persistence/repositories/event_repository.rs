use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use std::fmt;

use crate::domain::lot;
use crate::domain::models::Event;
use crate::infrastructure::persistence::error::DbError;

use super::address_repository::max_id_of;
use super::FLUSH_CHUNK;

/// Repository for the append-only events table
#[derive(Clone)]
pub struct EventRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for EventRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRepository").finish_non_exhaustive()
    }
}

impl EventRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Highest assigned id, for seeding the in-memory id allocator
    pub async fn max_id(&self) -> Result<i64, DbError> {
        max_id_of(&self.conn, "events").await
    }

    /// Bulk append audit-log rows
    pub async fn flush<C: ConnectionTrait>(&self, conn: &C, rows: &[Event]) -> Result<(), DbError> {
        for chunk in rows.chunks(FLUSH_CHUNK) {
            let values: Vec<String> = chunk
                .iter()
                .map(|e| {
                    let (amount_0, amount_1) = lot::split_u128(e.amount);
                    format!(
                        "({}, {}, {}, {}, {}, {}, {}, {}, {})",
                        e.id,
                        e.event_type.as_i16(),
                        e.block as i32,
                        e.transaction_id,
                        e.dune_id,
                        amount_0,
                        amount_1,
                        e.from_address_id,
                        e.to_address_id,
                    )
                })
                .collect();

            let sql = format!(
                "INSERT INTO events (id, event_type, block, transaction_id, dune_id, \
                 amount_0, amount_1, from_address_id, to_address_id) VALUES {} \
                 ON CONFLICT (id) DO NOTHING",
                values.join(", ")
            );

            conn.execute(Statement::from_string(DbBackend::Postgres, sql))
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;
        }
        Ok(())
    }
}
